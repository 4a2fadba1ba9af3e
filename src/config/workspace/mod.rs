pub mod remote;
pub mod storage_paths;
