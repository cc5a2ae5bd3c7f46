use crate::core::controller::DeskEvent;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for the loading spinner.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Background work reporting back to the desk controller.
    Desk(DeskEvent),
}

/// Which field of the desk has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    CustomerSearch,
    DeviceSearch,
    DeviceList,
    ReportType,
    StartDate,
    EndDate,
    Generate,
}

impl Focus {
    pub const ALL: [Focus; 7] = [
        Focus::CustomerSearch,
        Focus::DeviceSearch,
        Focus::DeviceList,
        Focus::ReportType,
        Focus::StartDate,
        Focus::EndDate,
        Focus::Generate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Focus::CustomerSearch => "客户名称",
            Focus::DeviceSearch => "设备编码",
            Focus::DeviceList => "设备列表",
            Focus::ReportType => "报表类型",
            Focus::StartDate => "开始日期",
            Focus::EndDate => "结束日期",
            Focus::Generate => "生成报表",
        }
    }

    /// Whether typed characters go into a text field.
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            Focus::CustomerSearch | Focus::DeviceSearch | Focus::StartDate | Focus::EndDate
        )
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}
