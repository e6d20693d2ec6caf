pub mod ocr;
pub mod phash;
pub mod phash_index;
pub mod pipeline;
pub mod task_store;
pub mod type_policy;
