pub mod liveness;
pub mod markdown;
pub mod route_guard;
pub mod storage;
pub mod theme;
pub mod time;
