mod report_dto;

pub use report_dto::{
    CreateReportDto, ImagePart, RawSubmission, ReportResponseDto, UpdateReportStatusDto,
    ValidatedSubmission, MAX_IMAGE_SIZE,
};
