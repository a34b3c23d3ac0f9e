//! Fixed calendar axis used by cost and overload calculations.

use std::fmt::{Display, Formatter};

/// Number of months in the budget horizon.
pub const MONTHS_PER_YEAR: usize = 12;

/// Calendar month of the budget year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const ALL_MONTHS: [Month; MONTHS_PER_YEAR] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// All months in calendar order.
    pub fn all() -> [Month; MONTHS_PER_YEAR] {
        ALL_MONTHS
    }

    /// Converts a 1-based calendar number (1 = January).
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::from_index(index)
    }

    /// Converts a 0-based cost index (0 = January).
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_MONTHS.get(index).copied()
    }

    /// 1-based calendar number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// 0-based index into `monthly_cost` and engine vectors.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Three-letter label used in compact reports.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
