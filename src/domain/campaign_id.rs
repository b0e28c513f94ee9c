use crate::domain::errors::DashboardError;

pub const DEFAULT_CAMPAIGN_ID_PREFIX: &str = "DALBA-CAMP";

/// Numeric part of an id: the segment after the last `-`
///
/// `Some(None)` means the suffix is all digits but does not fit in a `u64`.
fn numeric_suffix(campaign_id: &str) -> Option<Option<u64>> {
    let suffix = campaign_id.rsplit('-').next()?.trim();
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(suffix.parse().ok())
}

/// Next campaign id: `{prefix}-{max suffix + 1}`, padded to three digits.
///
/// Every existing id must carry a numeric suffix. An empty table starts
/// at `001`.
pub fn next_campaign_id<'a, I>(prefix: &str, existing: I) -> Result<String, DashboardError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max: Option<(u64, &str)> = None;
    for campaign_id in existing {
        let n = numeric_suffix(campaign_id)
            .ok_or_else(|| DashboardError::UnnumberedCampaignId {
                campaign_id: campaign_id.to_string(),
            })?
            .ok_or_else(|| DashboardError::CampaignIdOutOfRange {
                campaign_id: campaign_id.to_string(),
            })?;
        if max.is_none_or(|(m, _)| n > m) {
            max = Some((n, campaign_id));
        }
    }

    let next = match max {
        None => 1,
        Some((n, campaign_id)) => {
            n.checked_add(1).ok_or_else(|| DashboardError::CampaignIdOutOfRange {
                campaign_id: campaign_id.to_string(),
            })?
        }
    };
    Ok(format!("{}-{:03}", prefix, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_after_max_suffix() {
        let ids = ["DALBA-CAMP-25001", "DALBA-CAMP-25017", "DALBA-CAMP-25003"];
        let next = next_campaign_id(DEFAULT_CAMPAIGN_ID_PREFIX, ids).unwrap();
        assert_eq!(next, "DALBA-CAMP-25018");
    }

    #[test]
    fn test_next_id_is_zero_padded() {
        let next = next_campaign_id("DALBA-CAMP", ["DALBA-CAMP-009"]).unwrap();
        assert_eq!(next, "DALBA-CAMP-010");
    }

    #[test]
    fn test_empty_table_starts_at_one() {
        let next = next_campaign_id("DALBA-CAMP", std::iter::empty()).unwrap();
        assert_eq!(next, "DALBA-CAMP-001");
    }

    #[test]
    fn test_unnumbered_id_fails() {
        let err = next_campaign_id("DALBA-CAMP", ["DALBA-CAMP-007", "SPRING-SALE"]).unwrap_err();
        match err {
            DashboardError::UnnumberedCampaignId { campaign_id } => {
                assert_eq!(campaign_id, "SPRING-SALE")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_max_suffix_cannot_be_incremented() {
        let top = format!("DALBA-CAMP-{}", u64::MAX);
        let err = next_campaign_id("DALBA-CAMP", ["DALBA-CAMP-001", top.as_str()]).unwrap_err();
        match err {
            DashboardError::CampaignIdOutOfRange { campaign_id } => assert_eq!(campaign_id, top),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_suffix_is_not_reported_as_unnumbered() {
        let long = "DALBA-CAMP-1234567890123456789012345";
        let err = next_campaign_id("DALBA-CAMP", [long]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::CampaignIdOutOfRange { ref campaign_id } if campaign_id == long
        ));
    }

    #[test]
    fn test_suffix_parsing() {
        assert_eq!(numeric_suffix("A-B-042"), Some(Some(42)));
        assert_eq!(numeric_suffix("12"), Some(Some(12)));
        assert_eq!(numeric_suffix("A-B-99999999999999999999"), Some(None));
        assert_eq!(numeric_suffix("A-B-"), None);
        assert_eq!(numeric_suffix("A-B-+5"), None);
    }
}
