pub mod market_calendar;
pub mod quote_service;
