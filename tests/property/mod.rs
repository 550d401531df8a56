//! Property test modules
