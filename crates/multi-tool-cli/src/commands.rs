pub mod create_agent;
pub mod create_session;
pub mod send_message;

#[cfg(test)]
pub mod mock_engine;
