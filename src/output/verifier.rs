//! Report verification implementation

use tracing::{info, warn};

use crate::domain::model::{AnalysisReport, PictureType};
use crate::output::{VerificationCheck, VerificationResult};
use crate::planner::GopParams;

/// Checks the structural guarantees of a finished report
pub struct ReportVerifier;

impl ReportVerifier {
    pub fn verify(report: &AnalysisReport, params: &GopParams) -> VerificationResult {
        let checks = vec![
            Self::check_presentation_order(report),
            Self::check_record_count(report),
            Self::check_intra_positions(report, params),
        ];
        let success = checks.iter().all(|c| c.success);

        if success {
            info!("Report verification passed");
        } else {
            for check in checks.iter().filter(|c| !c.success) {
                warn!("Report check {} failed: {}", check.check_type, check.details);
            }
        }
        VerificationResult { success, checks }
    }

    fn check_presentation_order(report: &AnalysisReport) -> VerificationCheck {
        let gap = report
            .records
            .iter()
            .enumerate()
            .find(|(i, r)| r.index != *i);
        VerificationCheck {
            check_type: "presentation_order".to_string(),
            details: match gap {
                Some((i, r)) => format!("record {} has index {}", i, r.index),
                None => format!("{} contiguous indices", report.records.len()),
            },
            success: gap.is_none(),
        }
    }

    fn check_record_count(report: &AnalysisReport) -> VerificationCheck {
        let expected = report.frames_read.saturating_sub(report.frames_discarded);
        VerificationCheck {
            check_type: "record_count".to_string(),
            details: format!(
                "{} records for {} read and {} discarded pictures",
                report.records.len(),
                report.frames_read,
                report.frames_discarded
            ),
            success: report.records.len() == expected,
        }
    }

    fn check_intra_positions(report: &AnalysisReport, params: &GopParams) -> VerificationCheck {
        let misplaced = report.records.iter().find(|r| {
            (r.picture_type == PictureType::I) != (r.index % params.gop_size == 0)
        });
        VerificationCheck {
            check_type: "intra_positions".to_string(),
            details: match misplaced {
                Some(r) => format!("picture {} is {}", r.index, r.picture_type),
                None => format!("I pictures every {} pictures", params.gop_size),
            },
            success: misplaced.is_none(),
        }
    }
}
