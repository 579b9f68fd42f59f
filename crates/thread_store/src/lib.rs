mod error;
mod schema;
mod store;

pub use error::ThreadStoreError;
pub use schema::{
    Message, NewMessage, Thread, ThreadDocument, ThreadSnapshot, DEFAULT_THREAD_TITLE,
};
pub use store::{ThreadStore, MAX_TITLE_CHARS, THREADS_FILE_NAME};
