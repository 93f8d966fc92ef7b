use std::fmt::Display;

use human_repr::HumanCount;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncodeReport {
    pub output_size: u64,
    pub input_size: u64,
    pub percent_saved: f64,
}

pub fn report(input_size: u64, output_size: u64) -> EncodeReport {
    let percent_saved = match input_size {
        0 => 0.0,
        _ => (1.0 - output_size as f64 / input_size as f64) * 100.0,
    };
    EncodeReport {
        output_size,
        input_size,
        percent_saved,
    }
}

impl Display for EncodeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Input:  {}", self.input_size.human_count_bytes())?;
        writeln!(f, "Output: {}", self.output_size.human_count_bytes())?;
        write!(f, "Saved:  {:.1}%", self.percent_saved)
    }
}
