// Handlers are split by access tier:
// book       - public reads (/book/*)
// admin_book - mutations behind the admin JWT check (/adminBook/*)
// system     - service descriptor and health
pub mod admin_book;
pub mod book;
pub mod system;
