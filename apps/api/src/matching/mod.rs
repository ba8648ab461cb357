pub mod embedding;
pub mod handlers;
pub mod pipeline;
pub mod similarity;
pub mod text;
