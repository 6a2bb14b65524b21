pub mod document_controller;
