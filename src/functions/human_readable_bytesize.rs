/// Convert a raw bytesize into a human readable string, e.g. 4_248_578 returns 4.25 MB
pub fn human_readable_bytesize(num: u64) -> String {
  const UNITS : [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
  const DELIMITER : f64 = 1000_f64;

  if num < 1000 {
    return format!("{} B", num);
  }
  let num = num as f64;
  let exponent = std::cmp::min((num.ln() / DELIMITER.ln()).floor() as i32, (UNITS.len() - 1) as i32);
  format!("{:.2} {}", num / DELIMITER.powi(exponent), UNITS[exponent as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_decimal_units() {
        assert_eq!(human_readable_bytesize(4_248_578_547), "4.25 GB");
        assert_eq!(human_readable_bytesize(4_248_578), "4.25 MB");
        assert_eq!(human_readable_bytesize(999), "999 B");
        assert_eq!(human_readable_bytesize(1000), "1.00 kB");
    }
}
