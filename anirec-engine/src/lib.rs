pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod menu;
pub mod preprocess;
pub mod protocol;
pub mod recommender;
pub mod server;
pub mod similarity;
pub mod stopwords;
pub mod transport;
pub mod types;
pub mod vectorizer;
