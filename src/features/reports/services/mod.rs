mod report_service;
mod verification_service;

pub use report_service::ReportService;
pub use verification_service::VerificationService;
