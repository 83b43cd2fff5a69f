//! Line-oriented operator input with re-prompting

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use validator::ValidationError;

/// Reads answers from `input`, writes questions to `output`.
///
/// End of input surfaces as `io::ErrorKind::UnexpectedEof` so the menu loop
/// can shut down cleanly when stdin closes.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// One trimmed line of input
    pub fn line(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(buf.trim().to_string())
    }

    /// Empty input means "no value"
    pub fn optional(&mut self, label: &str) -> io::Result<Option<String>> {
        let value = self.line(label)?;
        Ok((!value.is_empty()).then_some(value))
    }

    /// Ask until `check` accepts the answer
    pub fn checked(
        &mut self,
        label: &str,
        check: impl Fn(&str) -> Result<(), ValidationError>,
    ) -> io::Result<String> {
        loop {
            let value = self.line(label)?;
            match check(&value) {
                Ok(()) => return Ok(value),
                Err(e) => self.complain(&e)?,
            }
        }
    }

    /// Like [`Prompt::checked`], but empty input is accepted as "no value"
    pub fn optional_checked(
        &mut self,
        label: &str,
        check: impl Fn(&str) -> Result<(), ValidationError>,
    ) -> io::Result<Option<String>> {
        loop {
            let Some(value) = self.optional(label)? else {
                return Ok(None);
            };
            match check(&value) {
                Ok(()) => return Ok(Some(value)),
                Err(e) => self.complain(&e)?,
            }
        }
    }

    /// Ask until the answer parses as a `T` (non-negative for unsigned types)
    pub fn number<T: FromStr>(&mut self, label: &str) -> io::Result<T> {
        loop {
            match self.line(label)?.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Invalid number, please enter a whole number >= 0.")?,
            }
        }
    }

    /// Like [`Prompt::number`], but empty input is accepted as "leave unchanged"
    pub fn optional_number<T: FromStr>(&mut self, label: &str) -> io::Result<Option<T>> {
        loop {
            let Some(value) = self.optional(label)? else {
                return Ok(None);
            };
            match value.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Invalid number, enter a whole number >= 0 or leave empty.")?,
            }
        }
    }

    /// yes / no / empty (keep current value)
    pub fn tri_state(&mut self, label: &str, current: bool) -> io::Result<Option<bool>> {
        let current = if current { "yes" } else { "no" };
        loop {
            let answer = self
                .line(&format!("{} (current: {}, yes/no, Enter to keep): ", label, current))?
                .to_lowercase();
            match answer.as_str() {
                "" => return Ok(None),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer 'yes', 'no' or press Enter.")?,
            }
        }
    }

    /// Menu selection in `0..=max`
    pub fn choice(&mut self, max: u8) -> io::Result<u8> {
        loop {
            match self.line("Select an option: ")?.parse::<u8>() {
                Ok(n) if n <= max => return Ok(n),
                _ => writeln!(self.output, "Invalid option, choose a number between 0 and {}.", max)?,
            }
        }
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.line("\nPress ENTER to return to the menu.")?;
        Ok(())
    }

    fn complain(&mut self, error: &ValidationError) -> io::Result<()> {
        match &error.message {
            Some(message) => writeln!(self.output, "{}", message),
            None => writeln!(self.output, "Invalid value ({}).", error.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::validate_phone;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_number_reprompts() {
        let mut p = prompt("abc\n-3\n12\n");
        assert_eq!(p.number::<u32>("Stock: ").unwrap(), 12);
        assert_eq!(output(p).matches("Invalid number").count(), 2);
    }

    #[test]
    fn test_optional_number() {
        let mut p = prompt("\n7\n");
        assert_eq!(p.optional_number::<u64>("Fee: ").unwrap(), None);
        assert_eq!(p.optional_number::<u64>("Fee: ").unwrap(), Some(7));
    }

    #[test]
    fn test_checked_phone() {
        let mut p = prompt("12\n\n1122334455\n");
        assert_eq!(p.optional_checked("Phone: ", validate_phone).unwrap(), None);
        let mut p2 = prompt("12\n1122334455\n");
        assert_eq!(
            p2.optional_checked("Phone: ", validate_phone).unwrap().as_deref(),
            Some("1122334455")
        );
        assert!(output(p2).contains("Phone must be 10 to 12 digits"));
    }

    #[test]
    fn test_tri_state() {
        let mut p = prompt("maybe\nYES\n\nno\n");
        assert_eq!(p.tri_state("Active?", false).unwrap(), Some(true));
        assert_eq!(p.tri_state("Active?", false).unwrap(), None);
        assert_eq!(p.tri_state("Active?", true).unwrap(), Some(false));
    }

    #[test]
    fn test_choice_range() {
        let mut p = prompt("9\nx\n3\n");
        assert_eq!(p.choice(4).unwrap(), 3);
    }

    #[test]
    fn test_eof() {
        let mut p = prompt("");
        let err = p.line("> ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
