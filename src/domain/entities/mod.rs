//! 핵심 도메인 엔티티 (MongoDB 영속 객체)

pub mod users;
