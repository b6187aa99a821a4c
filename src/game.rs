//! 游戏逻辑：slug 推导、计分与关卡推进

pub mod progression;
pub mod scoring;
pub mod slug;
