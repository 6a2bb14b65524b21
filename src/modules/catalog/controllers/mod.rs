pub mod catalog_controller;
