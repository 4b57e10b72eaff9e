pub mod aggregation_service;
pub mod calendar_service;
pub mod dto;
pub mod hours_service;
pub mod meeting_service;
