pub mod cv;
pub mod job;
pub mod match_result;

pub use cv::CvRow;
pub use job::JobRow;
pub use match_result::MatchResult;
