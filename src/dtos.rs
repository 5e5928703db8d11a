pub mod messagedtos;
pub mod profiledtos;
pub mod userdtos;
