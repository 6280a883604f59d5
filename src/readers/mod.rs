pub mod record_loader;

pub use record_loader::RecordLoader;
