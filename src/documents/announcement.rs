//! One-page announcement flyer for Sefaria Chat.

use std::path::Path;

use crate::assembler::SavedDocument;
use crate::builder::{DocumentBuilder, Margins};
use crate::elements;
use crate::error::Result;
use crate::model::{
    Block, ColumnWidths, HeadingBlock, HeadingLevel, HorizontalAlignment, Outline, Section,
    TableLayout,
};
use crate::richtext::Run;
use crate::style::{Rgb, Style, StyleName, StyleRegistry, DEFAULT_FONT_FAMILY};

/// File name of the flyer, relative to the output directory.
pub const OUTPUT_FILE: &str = "Sefaria Chat Announcement.docx";

const NAVY: Rgb = Rgb::new(0x1A, 0x47, 0x8A);
const BLUE: Rgb = Rgb::new(0x2C, 0x5F, 0xA1);
const SKY: Rgb = Rgb::new(0x3A, 0x7C, 0xBD);
const TEXT: Rgb = Rgb::new(0x33, 0x33, 0x33);
const DARK_GREY: Rgb = Rgb::new(0x44, 0x44, 0x44);
const GREY: Rgb = Rgb::new(0x55, 0x55, 0x55);
const LIGHT_GREY: Rgb = Rgb::new(0x99, 0x99, 0x99);
const HEADER_FILL: Rgb = Rgb::new(0xD9, 0xE2, 0xF3);

const CLOUD: &str = "\u{2601}\u{fe0f}";
const LAPTOP: &str = "\u{1f4bb}";

const PROMPTS: [(&str, &str); 8] = [
    (
        "\u{201c}What is today\u{2019}s Torah portion and Daf Yomi?\u{201d}",
        " \u{2014} pulls the live Jewish calendar",
    ),
    (
        "\u{201c}Show me an ancient manuscript of Genesis 1:1\u{201d}",
        " \u{2014} retrieves and displays actual manuscript images",
    ),
    (
        "\u{201c}Compare translations of Psalm 23\u{201d}",
        " \u{2014} shows multiple English renderings side by side",
    ),
    (
        "\u{201c}What does Judaism teach about forgiveness and repentance?\u{201d}",
        " \u{2014} searches across the entire library and synthesizes sources from Tanakh, Talmud, Rambam, and beyond",
    ),
    (
        "\u{201c}Explain the structure of the Talmud \u{2014} Mishnah and Gemara\u{201d}",
        " \u{2014} gives a comprehensive educational overview",
    ),
    (
        "\u{201c}Tell me about Shabbat \u{2014} its sources, themes, and subtopics\u{201d}",
        " \u{2014} pulls Sefaria\u{2019}s curated topic pages",
    ),
    (
        "\u{201c}Look up the word \u{2018}chesed\u{2019} in Jastrow\u{2019}s dictionary\u{201d}",
        " \u{2014} searches classical Hebrew/Aramaic dictionaries",
    ),
    (
        "\u{201c}What does Rashi say about Noah\u{2019}s drunkenness?\u{201d}",
        " \u{2014} pinpoints specific commentary",
    ),
];

const PROVIDERS: [[&str; 3]; 9] = [
    [CLOUD, "Google Gemini", "Gemini 2.5 Flash, Pro, and more \u{2014} free tier available!"],
    [CLOUD, "OpenAI", "GPT-4.1, GPT-4o, o4 Mini"],
    [CLOUD, "Anthropic", "Claude Sonnet 4, Claude 3.5 Haiku"],
    [CLOUD, "xAI", "Grok 3, Grok 3 Mini (fast & regular)"],
    [CLOUD, "Mistral AI", "Mistral Small, Medium, Large"],
    [CLOUD, "DeepSeek", "DeepSeek-V3, DeepSeek-R1"],
    [CLOUD, "Groq", "Llama 3.3 70B, Mixtral, Gemma 2 \u{2014} blazing fast inference"],
    [CLOUD, "OpenRouter", "Multi-model gateway \u{2014} access dozens of models through one key"],
    [LAPTOP, "Ollama (Local)", "Runs 100% offline. No API key. No internet. Auto-detects your models."],
];

const FEATURES: [(&str, &str); 9] = [
    ("Streaming responses", " \u{2014} watch the AI think in real time with live Markdown rendering"),
    ("Automatic source retrieval", " \u{2014} the AI calls up to 10 rounds of tools to find exactly the right texts"),
    ("Mermaid diagrams", " \u{2014} ask for a timeline or flowchart and get a visual diagram"),
    ("Citation auto-linking", " \u{2014} even bare references like \u{201c}Berakhot 2a\u{201d} become clickable Sefaria links"),
    ("Chat history", " \u{2014} save, load, and manage multiple conversations"),
    ("Print to PDF", " \u{2014} export any conversation for study or sharing"),
    ("First-run setup wizard", " \u{2014} choose your provider and start chatting in under a minute"),
    ("Auto-updates", " \u{2014} always get the latest features automatically"),
    ("100% private", " \u{2014} no telemetry, no analytics, no tracking. Your API keys and chats stay on your machine."),
];

const STEPS: [&str; 3] = [
    "Download Sefaria Chat (available on Windows, including the Microsoft Store)",
    "Pick a provider (try Gemini for free, or Ollama for fully offline)",
    "Start asking questions!",
];

/// Style registry for the flyer: dark grey body text and three shades of blue headings.
pub fn styles() -> StyleRegistry {
    let heading = |size_pt, color| {
        Style::new(DEFAULT_FONT_FAMILY, size_pt)
            .with_color(color)
            .with_bold(true)
            .with_spacing(14.0, 6.0)
    };
    StyleRegistry::standard()
        .with_style(
            StyleName::Body,
            Style::new(DEFAULT_FONT_FAMILY, 11.0)
                .with_color(TEXT)
                .with_spacing(0.0, 6.0),
        )
        .with_style(StyleName::Heading1, heading(22.0, NAVY))
        .with_style(StyleName::Heading2, heading(15.0, BLUE))
        .with_style(StyleName::Heading3, heading(13.0, SKY))
}

/// Builder with the flyer's narrow top and bottom margins.
pub fn builder() -> DocumentBuilder {
    DocumentBuilder::new()
        .with_margins(Margins::inches(0.8, 1.0, 0.8, 1.0))
        .with_styles(styles())
}

/// The complete flyer content.
pub fn outline() -> Result<Outline> {
    Ok(Outline::new()
        .with_section(title())
        .with_section(prompts())
        .with_section(providers()?)
        .with_section(features())
        .with_section(get_started()))
}

/// Builds the flyer and saves it as [`OUTPUT_FILE`] inside `output_dir`.
pub fn build(output_dir: &Path) -> Result<SavedDocument> {
    let mut assembler = builder().build()?;
    assembler.push_outline(outline()?)?;
    assembler.save(output_dir.join(OUTPUT_FILE))
}

fn title() -> Section {
    let heading = HeadingBlock::new(HeadingLevel::One, "Sefaria Chat")
        .with_run(Run::new("Sefaria Chat").sized(28.0).colored(NAVY))
        .with_alignment(HorizontalAlignment::Center);

    Section::builder()
        .title("Title")
        .push_block(Block::Heading(heading))
        .push_block(elements::paragraph(
            vec![Run::new("AI-Powered Jewish Text Exploration, Right on Your Desktop")
                .bold()
                .sized(14.0)
                .colored(GREY)],
            Some(HorizontalAlignment::Center),
            Some(4.0),
        ))
        .push_block(elements::paragraph(
            vec![Run::new("\u{2501}".repeat(50)).colored(NAVY).sized(10.0)],
            Some(HorizontalAlignment::Center),
            Some(12.0),
        ))
        .push_block(Block::paragraph(vec![
            Run::new("Ever wished you could have a conversation with the entire Sefaria library? ")
                .italic()
                .sized(12.0)
                .colored(DARK_GREY),
            Run::new("Now you can.")
                .bold()
                .italic()
                .sized(12.0)
                .colored(NAVY),
        ]))
        .push_block(elements::text(
            "Sefaria Chat is a free, open-source desktop app that connects the world\u{2019}s largest \
             digital collection of Jewish texts \u{2014} Torah, Talmud, Midrash, Halakha, Kabbalah, \
             philosophy, and more \u{2014} to the AI model of your choice. Ask a question in plain English, \
             and the AI automatically searches Sefaria\u{2019}s library, retrieves primary sources with \
             original Hebrew/Aramaic alongside English translations, and weaves them into rich, scholarly \
             responses \u{2014} complete with clickable links back to Sefaria.org.",
        ))
        .build()
}

fn prompts() -> Section {
    Section::builder()
        .title("What Can You Ask?")
        .push_block(elements::heading(HeadingLevel::Two, "What Can You Ask?"))
        .extend_blocks(PROMPTS.iter().map(|(prompt, description)| {
            elements::bullet_runs(vec![
                Run::new(*prompt).bold().colored(NAVY),
                Run::new(*description),
            ])
        }))
        .push_block(elements::blank())
        .push_block(Block::paragraph(vec![
            Run::new("Every text reference is a clickable hyperlink. ").bold(),
            Run::new(
                "Click any source and it opens right inside the app in a side-by-side embedded browser.",
            ),
        ]))
        .build()
}

fn providers() -> Result<Section> {
    let layout = TableLayout::new()
        .with_widths(ColumnWidths::ratio([4, 16, 45]))
        .with_font_size(10.0)
        .with_alignment(HorizontalAlignment::Center)
        .with_header_fill(HEADER_FILL)
        .with_emphasized_column(1);
    let table = elements::table(["", "Provider", "Highlights"], PROVIDERS, layout)?;

    Ok(Section::builder()
        .title("Use Any AI Model")
        .push_block(elements::heading(
            HeadingLevel::Two,
            "Use Any AI Model \u{2014} Online or Offline",
        ))
        .push_block(elements::text(
            "Sefaria Chat supports 9 LLM providers with dozens of models, so you pick what works for you:",
        ))
        .push_block(table)
        .push_block(elements::blank())
        .push_block(Block::paragraph(vec![
            Run::new("Want to use a free model? ").bold(),
            Run::new("Google Gemini\u{2019}s free tier gives you powerful AI at zero cost. "),
            Run::new("Want total privacy? ").bold(),
            Run::new(
                "Ollama runs entirely on your machine \u{2014} your questions never leave your computer.",
            ),
        ]))
        .build())
}

fn features() -> Section {
    Section::builder()
        .title("Key Features")
        .push_block(elements::heading(HeadingLevel::Two, "Key Features"))
        .extend_blocks(FEATURES.iter().map(|(name, description)| {
            elements::bullet_runs(vec![
                Run::new(*name).bold().colored(NAVY),
                Run::new(*description),
            ])
        }))
        .build()
}

fn get_started() -> Section {
    Section::builder()
        .title("Get Started")
        .push_block(elements::heading(HeadingLevel::Two, "Get Started"))
        .extend_blocks(
            STEPS
                .iter()
                .enumerate()
                .map(|(index, step)| elements::numbered_step(index + 1, *step, NAVY, 12.0)),
        )
        .push_block(elements::blank())
        .push_block(elements::paragraph(
            vec![Run::new("Built with love for the Jewish text tradition.")
                .italic()
                .sized(11.0)
                .colored(GREY)],
            Some(HorizontalAlignment::Center),
            None,
        ))
        .push_block(elements::paragraph(
            vec![Run::new("MIT licensed \u{2022} Open source \u{2022} Free forever")
                .bold()
                .sized(11.0)
                .colored(NAVY)],
            Some(HorizontalAlignment::Center),
            None,
        ))
        .push_block(elements::blank())
        .push_block(elements::paragraph(
            vec![Run::new(
                "Sefaria Chat is an independent project and is not developed by or affiliated with Sefaria.org.",
            )
            .italic()
            .sized(9.0)
            .colored(LIGHT_GREY)],
            Some(HorizontalAlignment::Center),
            None,
        ))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Operation;

    #[test]
    fn flyer_has_no_page_breaks_and_one_provider_table() {
        let mut assembler = builder().build_recorder().expect("complete styles");
        assembler.push_outline(outline().expect("valid outline")).expect("push");
        assert_eq!(assembler.sections(), 5);
        let sink = assembler.into_sink();
        assert_eq!(sink.page_breaks(), 0);

        let tables: Vec<_> = sink
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 9);
        assert_eq!(tables[0].header_fill, Some(HEADER_FILL));
        assert_eq!(tables[0].alignment, HorizontalAlignment::Center);
        assert!(tables[0].rows.iter().all(|row| row[1].bold && !row[2].bold));
        // 6.5in of text width split 4:16:45.
        assert_eq!(tables[0].column_widths_twips, vec![576, 2304, 6480]);
    }

    #[test]
    fn title_uses_the_restyled_heading_run() {
        let mut assembler = builder().build_recorder().expect("complete styles");
        assembler.push_section(title()).expect("push");
        let sink = assembler.into_sink();
        let Operation::Paragraph(heading) = &sink.operations()[0] else {
            panic!("expected the title paragraph");
        };
        assert_eq!(heading.format.style, StyleName::Heading1);
        assert_eq!(heading.format.alignment, HorizontalAlignment::Center);
        assert_eq!(heading.runs[0].size_pt, 28.0);
        assert_eq!(heading.runs[0].color, NAVY);
    }
}
