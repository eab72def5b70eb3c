pub mod settled_event_map;
pub mod stable_settled_event;
