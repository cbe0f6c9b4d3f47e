// Interface adapters: API transports, cookie-backed session and view navigation.

pub mod clients;
pub mod cookie_jar;
pub mod navigator;
pub mod utils;
