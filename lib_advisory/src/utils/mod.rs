pub mod sys_info;
pub mod time;
