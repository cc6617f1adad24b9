// Craftbot - seq2seq Minecraft Q&A console chatbot
// Library exports

// Core modules
pub mod config;
pub mod console;
pub mod decoder;
pub mod model;
pub mod profile;
pub mod rating;
pub mod session;
