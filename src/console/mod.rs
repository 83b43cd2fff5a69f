//! Text menu front-end.
//!
//! Every action runs one service call and prints its outcome; failures are
//! reported with their error code and control always returns to the menu.

pub mod prompt;
pub mod render;

use std::io::{self, BufRead, Write};

use validator::{ValidateEmail, ValidationError};

use crate::{
    error::AppError,
    models::{
        member::{validate_person_name, validate_phone},
        CreateLoan, Deactivation, ItemChanges, LoanTerm, MemberChanges, NewItem, NewMember,
        ReturnOutcome, Stamp,
    },
    services::Services,
};

use prompt::Prompt;

const HEADER: &str = "---------------------------";

pub struct Console<R, W> {
    services: Services,
    prompt: Prompt<R, W>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            prompt: Prompt::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Run the main menu until the operator exits or input closes
    pub fn run(&mut self) -> io::Result<()> {
        match self.main_menu() {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::info!("Input closed, leaving the desk");
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            let choice = self.menu(
                "MAIN MENU",
                &["Members", "Items", "Loans", "Reports"],
                "Exit",
            )?;
            match choice {
                0 => return Ok(()),
                1 => self.members_menu()?,
                2 => self.items_menu()?,
                3 => self.loans_menu()?,
                4 => self.reports_menu()?,
                _ => unreachable!("choice is bounded by the menu size"),
            }
        }
    }

    fn menu(&mut self, title: &str, options: &[&str], back: &str) -> io::Result<u8> {
        let out = self.prompt.out();
        writeln!(out)?;
        writeln!(out, "{}", HEADER)?;
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", HEADER)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "[{}] {}", i + 1, option)?;
        }
        writeln!(out, "{}", HEADER)?;
        writeln!(out, "[0] {}", back)?;
        writeln!(out, "{}", HEADER)?;
        self.prompt.choice(options.len() as u8)
    }

    fn members_menu(&mut self) -> io::Result<()> {
        loop {
            let choice = self.menu(
                "MAIN MENU > MEMBERS",
                &["Register member", "Edit member", "Deactivate member", "List active members"],
                "Back",
            )?;
            match choice {
                0 => return Ok(()),
                1 => self.register_member()?,
                2 => self.edit_member()?,
                3 => self.deactivate_member()?,
                4 => self.list_members()?,
                _ => unreachable!("choice is bounded by the menu size"),
            }
            self.prompt.pause()?;
        }
    }

    fn items_menu(&mut self) -> io::Result<()> {
        loop {
            let choice = self.menu(
                "MAIN MENU > ITEMS",
                &[
                    "Add item",
                    "Edit item",
                    "Deactivate item",
                    "List active items",
                    "Search items by author",
                    "Search items by category",
                ],
                "Back",
            )?;
            match choice {
                0 => return Ok(()),
                1 => self.add_item()?,
                2 => self.edit_item()?,
                3 => self.deactivate_item()?,
                4 => self.list_items()?,
                5 => self.search_by_author()?,
                6 => self.search_by_category()?,
                _ => unreachable!("choice is bounded by the menu size"),
            }
            self.prompt.pause()?;
        }
    }

    fn loans_menu(&mut self) -> io::Result<()> {
        loop {
            let choice = self.menu("MAIN MENU > LOANS", &["Register loan", "Return loan"], "Back")?;
            match choice {
                0 => return Ok(()),
                1 => self.register_loan()?,
                2 => self.return_loan()?,
                _ => unreachable!("choice is bounded by the menu size"),
            }
            self.prompt.pause()?;
        }
    }

    fn reports_menu(&mut self) -> io::Result<()> {
        loop {
            let choice = self.menu(
                "MAIN MENU > REPORTS",
                &[
                    "Loans this month",
                    "Annual loans per item (count)",
                    "Annual loans per item (revenue)",
                    "Overdue loans",
                ],
                "Back",
            )?;
            match choice {
                0 => return Ok(()),
                1 => self.monthly_ledger()?,
                2 => self.annual_report(false)?,
                3 => self.annual_report(true)?,
                4 => self.overdue_report()?,
                _ => unreachable!("choice is bounded by the menu size"),
            }
            self.prompt.pause()?;
        }
    }

    // ---------------------------------------------------------------------
    // Members
    // ---------------------------------------------------------------------

    fn register_member(&mut self) -> io::Result<()> {
        self.heading("New member")?;
        let p = &mut self.prompt;
        let member = NewMember {
            first_name: p.checked("First name: ", validate_person_name)?,
            last_name: p.checked("Last name: ", validate_person_name)?,
            address: p.line("Address: ")?,
            email: p.checked("Email: ", check_email)?,
            program: p.line("Program of study: ")?,
            phone1: p.optional_checked("Phone 1 (Enter to skip): ", validate_phone)?,
            phone2: p.optional_checked("Phone 2 (Enter to skip): ", validate_phone)?,
            phone3: p.optional_checked("Phone 3 (Enter to skip): ", validate_phone)?,
        };
        match self.services.members.register(member) {
            Ok((id, member)) => writeln!(
                self.prompt.out(),
                "\nMember '{}' (ID: {}) registered.",
                member.full_name(),
                id
            ),
            Err(e) => self.report_error(e),
        }
    }

    fn edit_member(&mut self) -> io::Result<()> {
        self.heading("Edit member")?;
        match self.services.members.list_active() {
            Ok(members) => {
                for (id, m) in &members {
                    writeln!(self.prompt.out(), "{}: {}", id, m.full_name())?;
                }
            }
            Err(e) => return self.report_error(e),
        }
        let id = self.prompt.line("Member ID to edit: ")?;
        let current = match self.services.members.get_member(&id) {
            Ok(member) => member,
            Err(e) => return self.report_error(e),
        };

        writeln!(self.prompt.out(), "\nLeave a field empty to keep its current value.")?;
        let p = &mut self.prompt;
        let changes = MemberChanges {
            first_name: p.optional_checked(&format!("First name ({}): ", current.first_name), validate_person_name)?,
            last_name: p.optional_checked(&format!("Last name ({}): ", current.last_name), validate_person_name)?,
            address: p.optional(&format!("Address ({}): ", current.address))?,
            email: p.optional_checked(&format!("Email ({}): ", current.email), check_email)?,
            program: p.optional(&format!("Program ({}): ", current.program))?,
            phone1: p.optional_checked(
                &format!("Phone 1 ({}): ", current.phones.phone1.as_deref().unwrap_or("")),
                validate_phone,
            )?,
            phone2: p.optional_checked(
                &format!("Phone 2 ({}): ", current.phones.phone2.as_deref().unwrap_or("")),
                validate_phone,
            )?,
            phone3: p.optional_checked(
                &format!("Phone 3 ({}): ", current.phones.phone3.as_deref().unwrap_or("")),
                validate_phone,
            )?,
        };
        match self.services.members.update(&id, changes) {
            Ok(_) => writeln!(self.prompt.out(), "\nMember {} updated.", id),
            Err(e) => self.report_error(e),
        }
    }

    fn deactivate_member(&mut self) -> io::Result<()> {
        let id = self.prompt.line("Member ID to deactivate: ")?;
        match self.services.members.deactivate(&id) {
            Ok(Deactivation::Deactivated) => writeln!(self.prompt.out(), "Member {} deactivated.", id),
            Ok(Deactivation::AlreadyInactive) => {
                writeln!(self.prompt.out(), "Member {} was already inactive.", id)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn list_members(&mut self) -> io::Result<()> {
        match self.services.members.list_active() {
            Ok(members) if members.is_empty() => writeln!(self.prompt.out(), "No active members."),
            Ok(members) => {
                for (id, member) in &members {
                    render::member_card(self.prompt.out(), id, member)?;
                }
                Ok(())
            }
            Err(e) => self.report_error(e),
        }
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    fn add_item(&mut self) -> io::Result<()> {
        self.heading("New item")?;
        let p = &mut self.prompt;
        let item = NewItem {
            title: p.checked("Title: ", |v| required(v, "Title is required"))?,
            publisher: p.line("Publisher: ")?,
            category: p.line("Category: ")?,
            quantity: p.number("Quantity: ")?,
            daily_rate: p.number("Daily fee: ")?,
            author1: p.optional("Main author: ")?,
            author2: p.optional("Second author: ")?,
            author3: p.optional("Third author: ")?,
        };
        match self.services.catalog.intake(item) {
            Ok((id, item)) => writeln!(
                self.prompt.out(),
                "\nItem '{}' (ID: {}) added{}.",
                item.title,
                id,
                if item.active { "" } else { " as inactive (no stock)" }
            ),
            Err(e) => self.report_error(e),
        }
    }

    fn edit_item(&mut self) -> io::Result<()> {
        self.heading("Edit item")?;
        match self.services.catalog.list_active() {
            Ok(items) => {
                for (id, item) in &items {
                    writeln!(self.prompt.out(), "{}: {}", id, item.title)?;
                }
            }
            Err(e) => return self.report_error(e),
        }
        let id = self.prompt.line("Item ID to edit: ")?;
        let current = match self.services.catalog.get_item(&id) {
            Ok(item) => item,
            Err(e) => return self.report_error(e),
        };

        writeln!(self.prompt.out(), "\nLeave a field empty to keep its current value.")?;
        let p = &mut self.prompt;
        let changes = ItemChanges {
            title: p.optional(&format!("Title ({}): ", current.title))?,
            publisher: p.optional(&format!("Publisher ({}): ", current.publisher))?,
            category: p.optional(&format!("Category ({}): ", current.category))?,
            quantity: p.optional_number(&format!("Quantity ({}): ", current.quantity))?,
            daily_rate: p.optional_number(&format!("Daily fee ({}): ", current.daily_rate))?,
            active: p.tri_state("Active?", current.active)?,
            author1: p.optional(&format!(
                "Author 1 ({}): ",
                current.authors.author1.as_deref().unwrap_or("")
            ))?,
            author2: p.optional(&format!(
                "Author 2 ({}): ",
                current.authors.author2.as_deref().unwrap_or("")
            ))?,
            author3: p.optional(&format!(
                "Author 3 ({}): ",
                current.authors.author3.as_deref().unwrap_or("")
            ))?,
        };
        match self.services.catalog.update(&id, changes) {
            Ok(_) => writeln!(self.prompt.out(), "\nItem {} updated.", id),
            Err(e) => self.report_error(e),
        }
    }

    fn deactivate_item(&mut self) -> io::Result<()> {
        let id = self.prompt.line("Item ID to deactivate: ")?;
        match self.services.catalog.deactivate(&id) {
            Ok(Deactivation::Deactivated) => writeln!(self.prompt.out(), "Item {} deactivated.", id),
            Ok(Deactivation::AlreadyInactive) => {
                writeln!(self.prompt.out(), "Item {} was already inactive.", id)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn list_items(&mut self) -> io::Result<()> {
        let result = self.services.catalog.list_active();
        self.print_items(result, "No active items.")
    }

    fn search_by_author(&mut self) -> io::Result<()> {
        let author = self.prompt.line("Author to search for: ")?;
        let result = self.services.catalog.search_by_author(&author);
        self.print_items(result, &format!("No items found for author '{}'.", author))
    }

    fn search_by_category(&mut self) -> io::Result<()> {
        let category = self.prompt.line("Category to search for: ")?;
        let result = self.services.catalog.search_by_category(&category);
        self.print_items(result, &format!("No items found in category '{}'.", category))
    }

    fn print_items(
        &mut self,
        result: Result<Vec<(String, crate::models::Item)>, AppError>,
        empty: &str,
    ) -> io::Result<()> {
        match result {
            Ok(items) if items.is_empty() => writeln!(self.prompt.out(), "{}", empty),
            Ok(items) => {
                for (id, item) in &items {
                    render::item_card(self.prompt.out(), id, item)?;
                }
                Ok(())
            }
            Err(e) => self.report_error(e),
        }
    }

    // ---------------------------------------------------------------------
    // Loans
    // ---------------------------------------------------------------------

    fn register_loan(&mut self) -> io::Result<()> {
        self.heading("New loan")?;
        let member_id = self.prompt.line("Member ID (e.g. 1001): ")?;
        let item_id = self.prompt.line("Item ID (e.g. L001): ")?;
        let terms = LoanTerm::ALL
            .iter()
            .map(|t| format!("{} = {}", t.code(), t))
            .collect::<Vec<_>>()
            .join(", ");
        let term_code = self.prompt.number(&format!("Loan term ({}): ", terms))?;

        let request = CreateLoan {
            member_id,
            item_id,
            term_code,
        };
        match self.services.loans.create_loan(request) {
            Ok((id, loan)) => {
                writeln!(self.prompt.out(), "\nLoan registered.")?;
                render::loan_summary(self.prompt.out(), &id, &loan)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn return_loan(&mut self) -> io::Result<()> {
        self.heading("Return loan")?;
        let id = self.prompt.line("Loan ID (YYYY.MM.DD HH.MM.SS): ")?;
        match self.services.loans.return_loan(&id) {
            Ok(ReturnOutcome::Returned) => writeln!(self.prompt.out(), "Return registered."),
            Ok(ReturnOutcome::AlreadyReturned) => {
                writeln!(self.prompt.out(), "This loan was already returned.")
            }
            Err(e) => self.report_error(e),
        }
    }

    // ---------------------------------------------------------------------
    // Reports
    // ---------------------------------------------------------------------

    fn monthly_ledger(&mut self) -> io::Result<()> {
        match self.services.stats.monthly_ledger() {
            Ok(entries) => render::ledger_table(self.prompt.out(), &entries),
            Err(e) => self.report_error(e),
        }
    }

    fn annual_report(&mut self, revenue: bool) -> io::Result<()> {
        let Some(year) = self.ask_year()? else {
            return Ok(());
        };
        let result = if revenue {
            self.services.stats.annual_revenue(year)
        } else {
            self.services.stats.annual_loan_counts(year)
        };
        match result {
            Ok(matrix) => {
                let unit = if revenue { "revenue" } else { "number of loans" };
                writeln!(self.prompt.out(), "\nLoans per item in {} ({})", year, unit)?;
                render::matrix_table(self.prompt.out(), &matrix)
            }
            Err(e) => self.report_error(e),
        }
    }

    /// `None` when the year could not be checked; the error is already reported
    fn ask_year(&mut self) -> io::Result<Option<i32>> {
        loop {
            let year = self.prompt.number("Year to summarize: ")?;
            match self.services.stats.check_year(year) {
                Ok(()) => return Ok(Some(year)),
                Err(AppError::YearOutOfRange { min, max, .. }) => {
                    writeln!(self.prompt.out(), "Please enter a year between {} and {}.", min, max)?
                }
                Err(e) => {
                    self.report_error(e)?;
                    return Ok(None);
                }
            }
        }
    }

    fn overdue_report(&mut self) -> io::Result<()> {
        let now = Stamp::now();
        match self.services.stats.overdue_loans_at(now) {
            Ok(entries) => render::overdue_list(self.prompt.out(), now, &entries),
            Err(e) => self.report_error(e),
        }
    }

    // ---------------------------------------------------------------------

    fn heading(&mut self, title: &str) -> io::Result<()> {
        let out = self.prompt.out();
        writeln!(out, "{}", HEADER)?;
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", HEADER)
    }

    fn report_error(&mut self, error: AppError) -> io::Result<()> {
        if error.is_storage() {
            tracing::error!("Operation aborted: {}", error);
        } else {
            tracing::warn!("Operation rejected: {}", error);
        }
        writeln!(self.prompt.out(), "Error [E{:02}]: {}", error.code() as u32, error)
    }
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    if value.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(message.into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, repository::{JsonStore, Repository}};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn services() -> (TempDir, Services) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.ensure_collections().unwrap();
        let services = Services::new(Repository::new(store), &AppConfig::default());
        (dir, services)
    }

    fn run_script(services: &Services, script: &str) -> String {
        let mut console = Console::new(
            services.clone(),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        );
        console.run().unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_scripted_session() {
        let (_dir, services) = services();
        let script = [
            // Items > Add item
            "2", "1", "Rayuela", "Sudamericana", "Novel", "3", "100", "Julio Cortazar", "", "",
            "", "0",
            // Members > Register, with one bad name, email and phone
            "1", "1", "Ana1", "Ana", "Paz", "Calle 1", "bad", "ana@uni.edu", "Letters",
            "12", "1122334455", "", "",
            "", "0",
            // Loans > Register, then one for an unknown member
            "3", "1", "1001", "L001", "1",
            "", "1", "9999", "L001", "1",
            "", "0",
            "0",
        ]
        .join("\n")
            + "\n";

        let out = run_script(&services, &script);

        assert!(out.contains("Item 'Rayuela' (ID: L001) added."));
        assert!(out.contains("Name must contain only letters and spaces"));
        assert!(out.contains("Invalid email format"));
        assert!(out.contains("Phone must be 10 to 12 digits"));
        assert!(out.contains("Member 'Ana Paz' (ID: 1001) registered."));
        assert!(out.contains("Loan registered."));
        assert!(out.contains("Fee: 700.00"));
        assert!(out.contains("Error [E04]"));

        let item = services.catalog.get_item("L001").unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(services.loans.list_loans().unwrap().len(), 1);
    }

    #[test]
    fn test_year_prompt_retries_until_in_range() {
        let (_dir, services) = services();
        let script = "4\n2\n1990\n2031\n2025\n\n0\n0\n";
        let out = run_script(&services, script);
        assert_eq!(out.matches("Please enter a year between 2000 and 2026.").count(), 2);
        assert!(out.contains("Loans per item in 2025 (number of loans)"));
        assert!(out.contains("TOTAL"));
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let (_dir, services) = services();
        let script = "1\n3\n4242\n\n0\n3\n2\n2025.01.01 00.00.00\n\n0\n0\n";
        let out = run_script(&services, script);
        assert!(out.contains("Error [E04]"));
        assert!(out.contains("Error [E20]"));
    }

    #[test]
    fn test_closed_input_exits_cleanly() {
        let (_dir, services) = services();
        let out = run_script(&services, "1\n");
        assert!(out.contains("MAIN MENU > MEMBERS"));
    }

    #[test]
    fn test_report_failure_returns_to_menu() {
        let (dir, services) = services();
        std::fs::remove_file(dir.path().join("items.json")).unwrap();
        let script = "4\n2\n2025\n\n1\n\n0\n0\n";
        let out = run_script(&services, script);
        assert!(out.contains("Error [E03]"));
        // Still at the reports menu afterwards: the monthly ledger ran
        assert!(out.contains("No loans registered this month."));
    }
}
