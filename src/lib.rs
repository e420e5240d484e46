pub mod buckets;
pub mod config;
pub mod forecast;
pub mod http;
pub mod openweathermap;
pub mod render;
pub mod schedule;
pub mod telegram;
pub mod windy;
