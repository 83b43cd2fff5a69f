//! Plain-text rendering of records and reports

use std::io::{self, Write};

use crate::models::{
    item::Item,
    loan::Loan,
    member::Member,
    report::{AnnualMatrix, LedgerEntry, OverdueEntry},
    stamp::Stamp,
};

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const RULE: &str = "------------------------------";

/// `1234567` -> `1,234,567.00`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(".00");
    grouped
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn or_blank(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

pub fn member_card(out: &mut impl Write, id: &str, member: &Member) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Member ID: {}", id)?;
    writeln!(out, "Full name: {}", member.full_name())?;
    writeln!(out, "Address: {}", member.address)?;
    writeln!(out, "Email: {}", member.email)?;
    writeln!(out, "Program: {}", member.program)?;
    writeln!(out, "Phone 1: {}", or_blank(member.phones.phone1.as_deref()))?;
    writeln!(out, "Phone 2: {}", or_blank(member.phones.phone2.as_deref()))?;
    writeln!(out, "Phone 3: {}", or_blank(member.phones.phone3.as_deref()))?;
    writeln!(out, "{}", RULE)
}

pub fn item_card(out: &mut impl Write, id: &str, item: &Item) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Item ID: {}", id)?;
    writeln!(out, "Title: {}", item.title)?;
    writeln!(out, "Publisher: {}", item.publisher)?;
    writeln!(out, "Category: {}", item.category)?;
    writeln!(out, "Quantity: {}", item.quantity)?;
    writeln!(out, "Author 1: {}", or_blank(item.authors.author1.as_deref()))?;
    writeln!(out, "Author 2: {}", or_blank(item.authors.author2.as_deref()))?;
    writeln!(out, "Author 3: {}", or_blank(item.authors.author3.as_deref()))?;
    writeln!(out, "Daily fee: {}", item.daily_rate)?;
    writeln!(out, "{}", RULE)
}

pub fn loan_summary(out: &mut impl Write, id: &str, loan: &Loan) -> io::Result<()> {
    writeln!(out, "Loan ID: {}", id)?;
    writeln!(out, "Member: {}  Item: {}", loan.member_id, loan.item_id)?;
    writeln!(out, "Term: {} ({} days)", loan.term, loan.term.days())?;
    writeln!(out, "Fee: {}", format_amount(loan.fee))?;
    writeln!(out, "Due: {}", loan.due_at)?;
    writeln!(out, "Returned: {}", loan.returned)
}

pub fn ledger_table(out: &mut impl Write, entries: &[LedgerEntry]) -> io::Result<()> {
    writeln!(
        out,
        "{:<20} {:<8} {:<6} {:<12} {:<20} {:<8} {:>15}",
        "Loan", "Member", "Item", "Term", "Due", "Returned", "Fee"
    )?;
    writeln!(out, "{}", "-".repeat(100))?;
    for e in entries {
        writeln!(
            out,
            "{:<20} {:<8} {:<6} {:<12} {:<20} {:<8} {:>15}",
            e.loan_id,
            e.member_id,
            e.item_id,
            e.term.to_string(),
            e.due_at.to_string(),
            e.returned,
            format_amount(e.fee)
        )?;
    }
    if entries.is_empty() {
        writeln!(out, "No loans registered this month.")?;
    }
    Ok(())
}

pub fn matrix_table(out: &mut impl Write, matrix: &AnnualMatrix) -> io::Result<()> {
    let year_suffix = matrix.year.rem_euclid(100);

    write!(out, "\n{:<25}", "Item")?;
    for month in MONTHS {
        write!(out, "{:>9}", format!("{}.{:02}", month, year_suffix))?;
    }
    writeln!(out)?;

    for row in &matrix.rows {
        write!(out, "{:<25}", truncate(&row.title, 23))?;
        for value in row.months {
            write!(out, "{:>9}", value)?;
        }
        writeln!(out)?;
    }

    write!(out, "{:<25}", "TOTAL")?;
    for value in matrix.totals {
        write!(out, "{:>9}", value)?;
    }
    writeln!(out)
}

pub fn overdue_list(out: &mut impl Write, now: Stamp, entries: &[OverdueEntry]) -> io::Result<()> {
    writeln!(out, "Overdue loans as of {}", now)?;
    writeln!(out, "{}", "-".repeat(55))?;
    for e in entries {
        writeln!(out, "Loan ID: {}", e.loan_id)?;
        writeln!(out, "Member: {}", e.member_name)?;
        writeln!(out, "Member ID: {}", e.member_id)?;
        writeln!(out, "Item ID: {}", e.item_id)?;
        writeln!(out, "Term: {}", e.term.code())?;
        writeln!(out, "Fee: ${}", e.fee)?;
        writeln!(out, "Due: {}", e.due_at)?;
        writeln!(out, "Days overdue: {}", e.days_overdue)?;
        writeln!(out, "{}", "-".repeat(55))?;
    }
    if entries.is_empty() {
        writeln!(out, "No overdue loans.")?;
    }
    Ok(())
}
