//! Resume segmentation and job description analysis

pub mod job_analyzer;
pub mod sections;
pub mod segmenter;
pub mod text_processor;
