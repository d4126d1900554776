pub mod api_client;
pub mod api_utils;
pub mod date_utils;
pub mod excel_importer;
pub mod export;
pub mod format;
