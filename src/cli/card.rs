use super::ui;
use crate::core::ConverterWidget;

impl ConverterWidget {
    /// Renders the converter card: header, then the loading notice, the
    /// error, or the From/To form.
    pub fn display_as_card(&self) -> String {
        let mut output = format!(
            "{} {}\n{}\n\n",
            ui::style_text("Currency", ui::StyleType::Title),
            ui::style_text("Converter", ui::StyleType::Title),
            ui::style_text(
                "Quickly convert between different currencies with live exchange rates.",
                ui::StyleType::Subtle
            ),
        );
        output.push_str(&format!(
            "{}\n{}\n\n",
            ui::style_text("Convert Your Currency", ui::StyleType::Accent),
            ui::style_text(
                "Enter the amount and select currencies to convert.",
                ui::StyleType::Label
            ),
        ));

        if self.is_loading() {
            output.push_str("Loading exchange rates...");
            return output;
        }
        if let Some(error) = self.error() {
            output.push_str(&ui::style_text(&error, ui::StyleType::Error));
            return output;
        }

        // Unset, zero and malformed amounts show an empty field
        let amount = self
            .amount()
            .filter(|a| *a != 0.0 && !a.is_nan())
            .map_or(String::new(), |a| a.to_string());
        let amount = if amount.is_empty() {
            ui::style_text("Amount", ui::StyleType::Subtle)
        } else {
            amount
        };

        output.push_str(&format!(
            "{}  {} {}\n",
            ui::style_text("From", ui::StyleType::Label),
            amount,
            self.source()
        ));
        output.push_str(&format!(
            "{}    {} {}",
            ui::style_text("To", ui::StyleType::Label),
            ui::style_text(self.converted(), ui::StyleType::Result),
            self.target()
        ));

        if let Some(date) = self.rates().date() {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(&format!("Rates as of {date}"), ui::StyleType::Subtle)
            ));
        }

        output
    }
}
