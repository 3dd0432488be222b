pub mod completion;
pub mod summarize;
