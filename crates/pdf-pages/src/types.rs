use crate::page::PageId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagesError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("{name} is not a PDF file")]
    NotPdf { name: String },
    #[error("No pages to process")]
    NoPages,
    #[error("Page {0} not found")]
    PageNotFound(PageId),
    #[error("Page {0} is already being transformed")]
    Busy(PageId),
}

pub type Result<T> = std::result::Result<T, PagesError>;
