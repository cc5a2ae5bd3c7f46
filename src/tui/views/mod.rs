pub mod device_list;
pub mod report_form;
