use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

const ACCOUNTS: &[&str] = &[
    "Acme Trading Ltd",
    "Globex Corporation",
    "Initech Payroll",
    "Umbrella Holdings",
    "Stark Industries",
    "Wayne Enterprises",
];

const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "NGN", "JPY"];

const BANKS: &[&str] = &[
    "First National Bank",
    "Banque Centrale",
    "Northern Trust",
    "Harbour Savings",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("account concession sheet.xlsx"));

    let mut rng = SimpleRng::new(42);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in ["ACCOUNT NAME", "ACCOUNT NUMBER", "CURRENCIES", "BANK"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    // Every account gets two or three currency lines, so the same name
    // appears on several rows.
    let mut row = 1u32;
    for account in ACCOUNTS {
        let lines = 2 + rng.next_u64() % 2;
        for _ in 0..lines {
            let number = 1_000_000_000 + rng.next_u64() % 9_000_000_000;
            sheet.write_string(row, 0, *account)?;
            sheet.write_number(row, 1, number as f64)?;
            sheet.write_string(row, 2, rng.pick(CURRENCIES))?;
            sheet.write_string(row, 3, rng.pick(BANKS))?;
            row += 1;
        }
    }
    sheet.autofit();

    workbook
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} accounts to {}", row - 1, path.display());
    Ok(())
}
