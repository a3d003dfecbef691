pub mod flipkart;

pub use flipkart::FlipkartScraper;
