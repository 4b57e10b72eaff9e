pub mod file;
pub mod memory;
pub mod timesheet;
pub mod traits;

// Re-export
pub use file::FileKeyValueStore;
pub use memory::MemoryStore;
pub use timesheet::TimesheetRepository;
pub use traits::KeyValueStore;
