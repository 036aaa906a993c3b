//! 증기 누설 계산 코어: 유량 추정, 기간 정규화, 영향 계산.

pub mod assessment;
pub mod duration;
pub mod flow_table;
pub mod impact;

pub use assessment::*;
pub use duration::*;
pub use flow_table::*;
pub use impact::*;
