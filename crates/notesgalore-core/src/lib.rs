pub mod blocks;
pub mod config;
pub mod db;
pub mod documents;
pub mod editor;
pub mod logging;
pub mod prefs;
pub mod slash;
pub mod theme;
pub mod upload;
