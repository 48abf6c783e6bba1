pub mod setting_engine;
