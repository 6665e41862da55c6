//! Record geometry of the fixed-width data sections

/// Number of records needed for `count` fields at `repeat` fields per record
pub const fn record_count(count: usize, repeat: usize) -> usize {
    if repeat == 0 {
        return 0;
    }
    count.div_ceil(repeat)
}

/// How a section of fields is split into lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Lines holding exactly `repeat` fields
    pub full_lines: usize,
    /// Fields on the final partial line, 0 when there is none
    pub remainder: usize,
}

impl RecordLayout {
    /// Layout of `count` fields at `repeat` fields per line
    pub const fn new(count: usize, repeat: usize) -> Self {
        if repeat == 0 {
            return Self {
                full_lines: 0,
                remainder: 0,
            };
        }
        Self {
            full_lines: count / repeat,
            remainder: count % repeat,
        }
    }

    /// Total number of lines
    pub const fn lines(&self) -> usize {
        self.full_lines + (self.remainder > 0) as usize
    }
}
