//! Multi-chapter technical reference for Sefaria Chat.
//!
//! Every chapter is its own [`Section`]; all but the last end with a page
//! break. The three diagrams are optional: when `docs/*.png` has not been
//! rendered yet the chapter is assembled without the picture.

use std::path::Path;

use crate::assembler::SavedDocument;
use crate::builder::DocumentBuilder;
use crate::elements;
use crate::error::Result;
use crate::model::{Block, HeadingLevel, HorizontalAlignment, Outline, Section, TableLayout};
use crate::richtext::Run;
use crate::style::{
    Rgb, Style, StyleName, StyleRegistry, DEFAULT_CODE_FONT_FAMILY, DEFAULT_FONT_FAMILY,
};

/// Directory holding the reference and its diagrams, relative to the project root.
pub const DOCS_DIR: &str = "docs";

/// File name of the reference inside [`DOCS_DIR`].
pub const OUTPUT_FILE: &str = "Sefaria Chat - Technical Reference.docx";

/// Diagram files looked up inside [`DOCS_DIR`].
pub const DIAGRAMS: [&str; 3] = ["architecture.png", "flowchart.png", "sequence.png"];

const DIAGRAM_WIDTH_IN: f64 = 6.5;

const INK: Rgb = Rgb::new(0x1A, 0x1A, 0x2E);
const GREY: Rgb = Rgb::new(0x55, 0x55, 0x55);
const MUTED: Rgb = Rgb::new(0x88, 0x88, 0x88);
const FAINT: Rgb = Rgb::new(0xAA, 0xAA, 0xAA);
const HEADER_FILL: Rgb = Rgb::new(0xDB, 0xE5, 0xF1);

const CHAPTERS: [&str; 10] = [
    "1. Project Overview",
    "2. Architecture",
    "3. Application Flowchart",
    "4. Message Data Flow (Sequence Diagram)",
    "5. IPC API Reference",
    "6. Provider Plugin Guide",
    "7. MCP Tool Catalog",
    "8. Build & Release Guide",
    "9. Configuration Reference",
    "10. Security Model",
];

/// Style registry for the reference: Calibri body, ink-colored headings, Consolas code.
pub fn styles() -> StyleRegistry {
    let heading = |size_pt| {
        Style::new(DEFAULT_FONT_FAMILY, size_pt)
            .with_color(INK)
            .with_bold(true)
            .with_spacing(12.0, 4.0)
    };
    StyleRegistry::standard()
        .with_style(StyleName::Heading1, heading(16.0))
        .with_style(StyleName::Heading2, heading(13.0))
        .with_style(StyleName::Heading3, heading(12.0))
        .with_style(
            StyleName::Code,
            Style::new(DEFAULT_CODE_FONT_FAMILY, 9.0).with_spacing(2.0, 2.0),
        )
}

/// Builder with the default Letter page and one inch margins.
pub fn builder() -> DocumentBuilder {
    DocumentBuilder::new().with_styles(styles())
}

/// The complete reference. Diagrams are looked up under `base_dir/docs`.
pub fn outline(base_dir: &Path) -> Result<Outline> {
    let docs = base_dir.join(DOCS_DIR);
    let diagram = |name: &str| elements::image_safe(docs.join(name), DIAGRAM_WIDTH_IN);

    let sections = vec![
        title_page(),
        contents(),
        overview()?,
        architecture(diagram(DIAGRAMS[0])?)?,
        flowchart(diagram(DIAGRAMS[1])?),
        sequence(diagram(DIAGRAMS[2])?),
        ipc()?,
        providers()?,
        tools()?,
        build_and_release()?,
        configuration()?,
        security()?,
    ];
    let last = sections.len() - 1;
    Ok(sections
        .into_iter()
        .enumerate()
        .map(|(index, section)| section.with_page_break_after(index != last))
        .collect())
}

/// Builds the reference and saves it as `docs/`[`OUTPUT_FILE`] under `base_dir`.
pub fn build(base_dir: &Path) -> Result<SavedDocument> {
    let mut assembler = builder().build()?;
    assembler.push_outline(outline(base_dir)?)?;
    assembler.save(base_dir.join(DOCS_DIR).join(OUTPUT_FILE))
}

fn table<const N: usize>(headers: [&str; N], rows: &[[&str; N]]) -> Result<Block> {
    let layout = TableLayout::new().with_header_fill(HEADER_FILL);
    elements::table(headers, rows.iter().copied(), layout)
}

fn bullets<'a>(items: &'a [&'a str]) -> impl Iterator<Item = Block> + 'a {
    items.iter().map(|item| elements::bullet_item(*item, None))
}

fn numbered<'a>(items: &'a [&'a str]) -> impl Iterator<Item = Block> + 'a {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| elements::text(format!("{}. {item}", index + 1)))
}

fn labelled<'a>(items: &'a [(&'a str, &'a str)]) -> impl Iterator<Item = Block> + 'a {
    items
        .iter()
        .map(|(label, text)| elements::labelled(label, *text))
}

fn centered(run: Run) -> Block {
    elements::paragraph(vec![run], Some(HorizontalAlignment::Center), None)
}

fn chapter(index: usize) -> Block {
    elements::heading(HeadingLevel::One, CHAPTERS[index])
}

fn h2(text: &str) -> Block {
    elements::heading(HeadingLevel::Two, text)
}

fn h3(text: &str) -> Block {
    elements::heading(HeadingLevel::Three, text)
}

fn title_page() -> Section {
    Section::builder()
        .title("Title page")
        .push_block(elements::blank())
        .push_block(elements::blank())
        .push_block(centered(
            Run::new("Sefaria Chat").sized(36.0).colored(INK).bold(),
        ))
        .push_block(centered(
            Run::new("Technical Reference & Architecture Guide")
                .sized(18.0)
                .colored(GREY),
        ))
        .push_block(elements::blank())
        .push_block(centered(Run::new("Version 1.3.2").sized(14.0)))
        .push_block(centered(
            Run::new("February 2026").sized(12.0).colored(MUTED),
        ))
        .push_block(elements::blank())
        .push_block(centered(
            Run::new("\u{a9} 2026 Jason Leznek \u{b7} MIT License")
                .sized(10.0)
                .colored(MUTED),
        ))
        .push_block(centered(
            Run::new("Not developed by or affiliated with Sefaria.org")
                .sized(9.0)
                .italic()
                .colored(FAINT),
        ))
        .build()
}

fn contents() -> Section {
    Section::builder()
        .title("Table of Contents")
        .push_block(elements::heading(HeadingLevel::One, "Table of Contents"))
        .extend_blocks(CHAPTERS.iter().map(|entry| {
            elements::paragraph(vec![Run::new(*entry).sized(12.0)], None, Some(4.0))
        }))
        .build()
}

fn overview() -> Result<Section> {
    const CAPABILITIES: &[&str] = &[
        "Multi-provider AI chat with streaming responses and live Markdown rendering",
        "Automatic tool calling against Sefaria's MCP servers for accurate text retrieval",
        "Auto-linking of Sefaria citations in responses (works with all providers including local models)",
        "Chat history with auto-save and restore",
        "In-app text viewer \u{2014} click any citation to read the source in a side pane",
        "Print preview with PDF generation",
        "Mermaid diagram and LaTeX math rendering in responses",
        "Auto-update with progress bar via GitHub Releases",
        "Code-signed Windows installers (x64 + arm64)",
    ];

    Ok(Section::builder()
        .title(CHAPTERS[0])
        .push_block(chapter(0))
        .push_block(elements::text(
            "Sefaria Chat is a standalone Electron desktop application for exploring the Sefaria digital library \
             of Jewish texts. It connects to Sefaria's MCP (Model Context Protocol) servers and supports \
             multiple AI providers \u{2014} Google Gemini, OpenAI, Anthropic Claude, and Ollama (local) \u{2014} for \
             AI-powered chat with tool calling.",
        ))
        .push_block(h2("Key Capabilities"))
        .extend_blocks(bullets(CAPABILITIES))
        .push_block(h2("Technology Stack"))
        .push_block(table(
            ["Component", "Technology"],
            &[
                ["Runtime", "Electron (Chromium + Node.js)"],
                ["Language", "TypeScript (main/preload), Vanilla JS (renderer)"],
                ["AI Providers", "Google Gemini, OpenAI, Anthropic, Ollama"],
                ["MCP Client", "@modelcontextprotocol/sdk (SSE + Streamable HTTP)"],
                ["Bundler", "esbuild (main + preload bundles)"],
                ["Packaging", "electron-builder \u{2192} Microsoft Store (appx)"],
            ],
        )?)
        .push_block(h2("Key Files"))
        .push_block(table(
            ["File", "Purpose"],
            &[
                ["src/main.ts", "Electron main process: window creation, IPC handlers, settings persistence"],
                ["src/preload.ts", "Context bridge exposing window.sefaria API to the renderer"],
                ["src/chat-engine.ts", "LLM streaming + tool-calling loop (up to 10 rounds)"],
                ["src/mcp-client.ts", "Manages SSE connections to both Sefaria MCP servers"],
                ["src/prompts.ts", "System and command prompts"],
                ["src/providers/", "Pluggable LLM provider implementations (Gemini, OpenAI, Anthropic, Ollama)"],
                ["src/renderer/", "Browser-side UI (HTML, CSS, vanilla JS)"],
                ["esbuild.js", "Build script for main + preload bundles"],
                ["package.json", "Scripts, deps, electron-builder config"],
            ],
        )?)
        .build())
}

fn architecture(diagram: Option<Block>) -> Result<Section> {
    Ok(Section::builder()
        .title(CHAPTERS[1])
        .push_block(chapter(1))
        .push_block(elements::text(
            "The application follows Electron's multi-process architecture with strict separation \
             between the main process (Node.js) and the renderer process (Chromium). All communication \
             passes through a preload script context bridge, ensuring the renderer never has direct \
             access to Node.js APIs.",
        ))
        .push_optional(diagram)
        .push_block(h2("Process Model"))
        .push_block(h3("Main Process (main.ts)"))
        .push_block(elements::text(
            "The main process runs in Node.js and manages the application lifecycle, window creation, \
             settings persistence, chat history, MCP connections, the chat engine, and auto-updates. \
             All IPC handlers are registered here.",
        ))
        .push_block(h3("Preload Script (preload.ts)"))
        .push_block(elements::text(
            "The preload script runs in a sandboxed context with access to both Node.js and the renderer DOM. \
             It exposes a typed window.sefaria API via Electron's contextBridge, mapping each method to an \
             IPC invoke or event listener.",
        ))
        .push_block(h3("Renderer Process (renderer/)"))
        .push_block(elements::text(
            "The renderer is a single-page application built with vanilla HTML, CSS, and JavaScript \u{2014} no \
             framework. It handles the chat UI, settings panel, embedded browser pane, Markdown rendering \
             (with Mermaid and KaTeX), and auto-linking of Sefaria citations.",
        ))
        .push_block(h2("External Services"))
        .push_block(table(
            ["Service", "URL", "Purpose"],
            &[
                ["Sefaria Texts MCP", "https://mcp.sefaria.org/sse", "Query the Sefaria library of Jewish texts"],
                ["Sefaria Developers MCP", "https://developers.sefaria.org/mcp", "API/code developer assistance"],
                ["Google Gemini API", "generativelanguage.googleapis.com", "Gemini LLM inference"],
                ["OpenAI API", "api.openai.com", "GPT/o-series LLM inference"],
                ["Anthropic API", "api.anthropic.com", "Claude LLM inference"],
                ["Ollama (local)", "localhost:11434", "Local LLM inference (no internet)"],
                ["GitHub Releases", "github.com/jleznek/sefaria-chat", "Auto-update distribution"],
            ],
        )?)
        .build())
}

fn flowchart(diagram: Option<Block>) -> Section {
    const STEPS: &[(&str, &str)] = &[
        ("1. User input", "User types a message and presses Enter (or clicks Send)."),
        ("2. Rate limit check", "The ChatEngine checks if the request is within the provider's RPM limit. If at capacity, it waits until a slot opens."),
        ("3. Stream to LLM", "The message (with full conversation history and system prompt) is sent to the configured LLM provider. Text is streamed back in real-time."),
        ("4. Tool-calling loop", "If the LLM response includes function calls, the engine executes each one against the appropriate Sefaria MCP server, adds results to the history, and sends it back to the LLM. This repeats for up to 10 rounds."),
        ("5. Final render", "The complete response is rendered as Markdown with automatic Sefaria citation linking, Mermaid diagrams, and KaTeX math."),
        ("6. Auto-save", "The conversation is automatically saved to disk as a JSON file."),
        ("7. Follow-ups", "If rate limit budget allows, the engine generates 2-3 follow-up question suggestions."),
    ];

    Section::builder()
        .title(CHAPTERS[2])
        .push_block(chapter(2))
        .push_block(elements::text(
            "The following diagram shows the three main flows through the application: \
             the settings configuration flow, the chat message flow (with tool-calling loop), \
             and the auto-update flow.",
        ))
        .push_optional(diagram)
        .push_block(h2("Chat Message Flow Detail"))
        .extend_blocks(labelled(STEPS))
        .build()
}

fn sequence(diagram: Option<Block>) -> Section {
    Section::builder()
        .title(CHAPTERS[3])
        .push_block(chapter(3))
        .push_block(elements::text(
            "This sequence diagram traces a single user message through every layer of the application, \
             showing IPC communication, LLM streaming, tool-call execution, and response rendering.",
        ))
        .push_optional(diagram)
        .build()
}

fn ipc() -> Result<Section> {
    Ok(Section::builder()
        .title(CHAPTERS[4])
        .push_block(chapter(4))
        .push_block(elements::text(
            "All communication between the renderer and main process passes through Electron's IPC system. \
             The preload script exposes these as the window.sefaria API. Below is the complete reference.",
        ))
        .push_block(h2("Renderer \u{2192} Main (invoke/handle)"))
        .push_block(elements::text(
            "These channels use ipcRenderer.invoke() / ipcMain.handle() (request-response pattern).",
        ))
        .push_block(table(
            ["Channel", "Parameters", "Returns", "Description"],
            &[
                ["get-providers", "(none)", "ProviderInfo[]", "List all available AI providers"],
                ["get-provider-config", "(none)", "{providerId, modelId, hasKey}", "Get active provider config"],
                ["save-provider-config", "{providerId, modelId, apiKey?}", "true", "Save provider settings, reinit engine"],
                ["get-configured-providers", "(none)", "(ProviderInfo & {hasKey})[]", "All providers with key status"],
                ["switch-provider", "{providerId, modelId}", "{success?, error?}", "Quick-switch without clearing history"],
                ["remove-provider-key", "providerId", "{success?, switchedTo?, modelId?}", "Remove a provider's API key"],
                ["detect-ollama", "(none)", "{available, models[]}", "Detect local Ollama installation"],
                ["get-api-key", "(none)", "string", "Legacy: get active provider key"],
                ["set-api-key", "apiKey", "true", "Legacy: set active provider key"],
                ["get-mcp-status", "(none)", "{connected, toolCount, servers?}", "MCP connection status"],
                ["send-message", "{message, responseLength?}", "{success?, error?, chatId?}", "Send message, triggers streaming"],
                ["clear-chat", "(none)", "true", "Clear conversation history"],
                ["reconnect-mcp", "(none)", "true", "Reconnect MCP servers"],
                ["list-chats", "(none)", "ChatSummary[]", "List saved chats (most recent first)"],
                ["load-chat", "chatId", "SavedChat | null", "Load and restore a saved chat"],
                ["delete-chat", "chatId", "true", "Delete a saved chat"],
                ["new-chat", "(none)", "true", "Start fresh chat"],
                ["get-usage-stats", "(none)", "{used, limit, resetsInSeconds}", "Rate limit usage"],
                ["resize-for-webview", "open: boolean", "void", "Resize window for side pane"],
                ["print-chat", "{html}", "void", "Generate PDF from chat HTML"],
                ["get-app-version", "(none)", "string", "App version from package.json"],
                ["get-changelog", "(none)", "string", "CHANGELOG.md contents"],
            ],
        )?)
        .push_block(elements::blank())
        .push_block(h2("Main \u{2192} Renderer (events)"))
        .push_block(elements::text(
            "These channels use webContents.send() / ipcRenderer.on() (push events from main to renderer).",
        ))
        .push_block(table(
            ["Channel", "Data", "Description"],
            &[
                ["chat-stream", "{chunk: string}", "Incremental text chunk during streaming"],
                ["chat-stream-end", "{followUps?: string[]}", "End of stream; includes follow-up suggestions"],
                ["tool-status", "{toolName, status}", "MCP tool call progress (calling/done)"],
                ["mcp-status", "{connected, toolCount?, error?, servers?}", "MCP connection status update"],
                ["open-url", "url: string", "Open URL in embedded webview pane"],
                ["usage-update", "{used, limit, resetsInSeconds}", "Rate limit stats after each message"],
            ],
        )?)
        .build())
}

fn providers() -> Result<Section> {
    const STEPS: &[&str] = &[
        "Create src/providers/myprovider.ts implementing the ChatProvider interface",
        "Export a MY_PROVIDER_INFO constant with the provider metadata (ProviderInfo)",
        "Export a MyProvider class with streamChat() and generateOnce() methods",
        "Add the provider to src/providers/index.ts: import it, add to AVAILABLE_PROVIDERS array, add a case to createProvider()",
        "Test: npm start \u{2192} Settings \u{2192} select your new provider \u{2192} enter API key \u{2192} send a message",
    ];
    const NOTES: &[&str] = &[
        "streamChat() must handle both text streaming AND tool-call extraction from the LLM response",
        "Tool declarations must be converted from the MCP format to the provider's native format",
        "Function call results must be formatted back into the provider's expected message format",
        "generateOnce() is used for follow-up question generation (no tool calling needed)",
        "Rate limiting is handled by the ChatEngine, not the provider",
    ];

    Ok(Section::builder()
        .title(CHAPTERS[5])
        .push_block(chapter(5))
        .push_block(elements::text(
            "Adding a new AI provider requires implementing the ChatProvider interface and registering it \
             in the provider index. The architecture is designed to make this straightforward.",
        ))
        .push_block(h2("ChatProvider Interface"))
        .push_block(elements::code_block(
            r#"interface ChatProvider {
    readonly info: ProviderInfo;

    streamChat(
        history: Message[],
        systemPrompt: string,
        tools: ToolDeclaration[],
        onTextChunk: (text: string) => void
    ): Promise<StreamResult>;

    generateOnce(prompt: string): Promise<string>;
}"#,
        ))
        .push_block(h2("ProviderInfo Interface"))
        .push_block(elements::code_block(
            r#"interface ProviderInfo {
    id: string;              // e.g. 'gemini', 'openai'
    name: string;            // Display name
    models: ProviderModel[]; // Available models
    defaultModel: string;    // Default model ID
    rateLimit: { rpm: number; windowMs: number };
    requiresKey?: boolean;   // false for Ollama
    keyPlaceholder: string;  // e.g. 'AIza...'
    keyHelpUrl: string;      // Link to get an API key
    keyHelpLabel: string;    // e.g. 'Google AI Studio'
}"#,
        ))
        .push_block(h2("Steps to Add a New Provider"))
        .extend_blocks(numbered(STEPS))
        .push_block(h2("Existing Providers"))
        .push_block(table(
            ["Provider", "ID", "Default Model", "RPM Limit", "Key Required"],
            &[
                ["Google Gemini", "gemini", "gemini-2.5-flash", "5 (model-dependent)", "Yes (free tier)"],
                ["OpenAI", "openai", "gpt-4.1-mini", "500", "Yes (paid)"],
                ["Anthropic", "anthropic", "claude-sonnet-4-20250514", "50", "Yes (paid)"],
                ["Ollama", "ollama", "llama3.2", "9999 (local)", "No"],
            ],
        )?)
        .push_block(h2("Key Implementation Notes"))
        .extend_blocks(bullets(NOTES))
        .build())
}

fn tools() -> Result<Section> {
    const STEPS: &[&str] = &[
        "On startup, McpClientManager connects to both servers and discovers available tools via the MCP listTools protocol",
        "When the ChatEngine sends a request to the LLM, it includes all discovered tool declarations",
        "The LLM can request tool calls in its response (e.g. get_text with ref \"Genesis 1:1\")",
        "The ChatEngine routes each call to the correct MCP server via McpClientManager.callTool()",
        "Tool results are added to the conversation history and sent back to the LLM",
        "This loop continues for up to 10 rounds until the LLM produces a final text response",
    ];

    Ok(Section::builder()
        .title(CHAPTERS[6])
        .push_block(chapter(6))
        .push_block(elements::text(
            "The app connects to two Sefaria MCP servers at startup. Tools are discovered dynamically \
             via the MCP protocol. Below are the known tools as of this writing.",
        ))
        .push_block(h2("Sefaria Texts MCP (mcp.sefaria.org)"))
        .push_block(elements::text(
            "This server provides tools for querying the Sefaria library of Jewish texts.",
        ))
        .push_block(table(
            ["Tool", "Description", "Key Parameters"],
            &[
                ["get_text", "Retrieve the text of a specific Sefaria reference", "ref: string (e.g. \"Genesis 1:1\")"],
                ["english_semantic_search", "Semantic search across English translations", "query: string, filters?: object"],
                ["text_search", "Full-text search across the library", "query: string, path?: string"],
                ["search_in_book", "Search within a specific book", "book: string, query: string"],
                ["get_links_between_texts", "Get links/connections between two texts", "ref1: string, ref2: string"],
                ["get_english_translations", "Get available English translations", "ref: string"],
                ["get_text_catalogue_info", "Get metadata about a text", "ref: string"],
                ["get_text_or_category_shape", "Get structure/shape of a text or category", "ref: string"],
                ["get_current_calendar", "Get today's calendar readings", "(none)"],
                ["get_topic_details", "Get details about a topic", "topic: string"],
                ["search_in_dictionaries", "Search dictionary entries", "query: string"],
                ["get_available_manuscripts", "List available manuscripts", "ref: string"],
                ["get_manuscript_image", "Get manuscript image URL", "manuscript_id: string"],
                ["clarify_name_argument", "Disambiguate a text reference", "name: string"],
                ["clarify_search_path_filter", "Help build a search filter path", "query: string"],
            ],
        )?)
        .push_block(elements::blank())
        .push_block(h2("Sefaria Developers MCP (developers.sefaria.org)"))
        .push_block(elements::text(
            "This server provides tools for querying the Sefaria API documentation, \
             helping developers build applications with the Sefaria API.",
        ))
        .push_block(h2("How Tool Calling Works"))
        .extend_blocks(numbered(STEPS))
        .build())
}

fn build_and_release() -> Result<Section> {
    const PIPELINE: &[(&str, &str)] = &[
        ("Type check", "tsc --noEmit \u{2014} validates TypeScript without emitting"),
        ("Bundle", "esbuild bundles src/main.ts \u{2192} dist/main.js and src/preload.ts \u{2192} dist/preload.js"),
        ("Copy renderer", "index.html, styles.css, and renderer.js are copied to dist/renderer/"),
    ];
    const PUBLISH: &[&str] = &[
        "Update version in package.json",
        "Add entry to CHANGELOG.md",
        "Commit and push: git add -A && git commit -m \"v{X.Y.Z}: description\" && git push",
        "Tag: git tag v{X.Y.Z} && git push --tags",
        "Build: npm run dist:win",
        "Create GitHub Release with all artifacts:",
    ];

    Ok(Section::builder()
        .title(CHAPTERS[7])
        .push_block(chapter(7))
        .push_block(h2("Development Setup"))
        .push_block(elements::code_block(
            r#"npm install          # Install dependencies
npm start            # Build and launch
npm run watch        # Watch mode (auto-rebuild on changes)
npx electron .       # Launch without rebuilding
# Press F5 in VS Code to debug the main process"#,
        ))
        .push_block(h2("Build Pipeline"))
        .push_block(elements::text("The build process has three stages:"))
        .extend_blocks(labelled(PIPELINE))
        .push_block(h2("Building Distributables"))
        .push_block(elements::code_block(
            r#"# Windows (NSIS installer + portable, x64 + arm64)
npm run dist:win

# macOS .dmg
npm run dist:mac

# Linux AppImage + .deb
npm run dist:linux"#,
        ))
        .push_block(elements::text("Output goes to the release/ directory."))
        .push_block(h2("Release Artifacts"))
        .push_block(table(
            ["Artifact", "Type", "Architectures"],
            &[
                ["Sefaria Chat-Setup-{ver}.exe", "NSIS installer (universal)", "x64 + arm64"],
                ["Sefaria Chat-Setup-{ver}-x64.exe", "NSIS installer", "x64 only"],
                ["Sefaria Chat-Setup-{ver}-arm64.exe", "NSIS installer", "arm64 only"],
                ["Sefaria Chat-Portable-{ver}.exe", "Portable (universal)", "x64 + arm64"],
                ["Sefaria Chat-Portable-{ver}-x64.exe", "Portable", "x64 only"],
                ["Sefaria Chat-Portable-{ver}-arm64.exe", "Portable", "arm64 only"],
                ["latest.yml", "Auto-updater manifest", "N/A"],
                ["*.blockmap", "Differential update data", "Per installer"],
            ],
        )?)
        .push_block(h2("Publishing a Release"))
        .extend_blocks(numbered(PUBLISH))
        .push_block(elements::code_block(
            r#"gh release create v{X.Y.Z} --title "v{X.Y.Z}" --notes "release notes" \
  release/Sefaria\ Chat-Setup-*.exe \
  release/Sefaria\ Chat-Portable-*.exe \
  release/latest.yml \
  release/*.blockmap"#,
        ))
        .push_block(h2("Code Signing"))
        .push_block(elements::text(
            "Windows builds are automatically signed using a certificate configured in package.json \
             (signtoolOptions). The certificate must be installed in the Windows Certificate Store \
             (Current User/Personal) with subject name \"Sefaria Chat\".",
        ))
        .push_block(h2("Distribution & Updates"))
        .push_block(elements::text(
            "The app is distributed exclusively through the Microsoft Store. Updates are delivered \
             automatically by the Store. The appx package is built using electron-builder.",
        ))
        .build())
}

fn configuration() -> Result<Section> {
    Ok(Section::builder()
        .title(CHAPTERS[8])
        .push_block(chapter(8))
        .push_block(h2("Settings File"))
        .push_block(elements::text(
            "Location: {userData}/settings.json (typically %APPDATA%/sefaria on Windows)",
        ))
        .push_block(elements::code_block(
            r#"{
    "provider": "gemini",                    // Active provider ID
    "model": "gemini-2.5-flash",            // Active model ID
    "apiKeys": {                             // API keys by provider
        "gemini": "AIza...",
        "openai": "sk-...",
        "anthropic": "sk-ant-..."
    },
    "windowBounds": {                        // Window position/size
        "x": 100, "y": 100,
        "width": 1200, "height": 800
    },
    "windowMaximized": false
}"#,
        ))
        .push_block(h2("Chat History"))
        .push_block(elements::text("Location: {userData}/chats/"))
        .push_block(elements::text(
            "Each chat is saved as a JSON file with the following structure:",
        ))
        .push_block(elements::code_block(
            r#"{
    "id": "chat_1707849600000_abc123",       // Unique ID
    "title": "What is the Shema?",           // First user message (≤60 chars)
    "createdAt": "2026-02-13T10:00:00.000Z",
    "updatedAt": "2026-02-13T10:05:00.000Z",
    "messages": [...],                        // UI-visible messages
    "history": [...]                          // Full engine history (for resuming)
}"#,
        ))
        .push_block(h2("Chat ID Format"))
        .push_block(elements::text(
            "Chat IDs follow the pattern chat_{timestamp}_{random6chars} and are validated with the regex \
             /^chat_\\d+_[a-z0-9]+$/ to prevent path traversal attacks.",
        ))
        .push_block(h2("User Data Directory"))
        .push_block(table(
            ["Path", "Contents"],
            &[
                ["{userData}/settings.json", "Provider config, API keys, window state"],
                ["{userData}/chats/", "Saved chat JSON files"],
                ["{userData}/logs/", "Electron log files (if enabled)"],
            ],
        )?)
        .build())
}

fn security() -> Result<Section> {
    const CONTROLS: &[&str] = &[
        "setWindowOpenHandler: Denies all popup windows; external URLs are routed to the embedded webview",
        "will-navigate: Blocks navigation away from the app's file:// URL; external URLs open in webview",
        "Link sanitization: The renderer strips non-http(s)/mailto hrefs, preventing javascript: and data: URI attacks",
        "Menu.setApplicationMenu(null): Removes default Electron menu to prevent unintended actions",
    ];
    const VALIDATIONS: &[&str] = &[
        "Chat ID validation: isValidChatId() uses regex /^chat_\\d+_[a-z0-9]+$/ to prevent path traversal when loading/deleting chats",
        "API keys: Stored locally in {userData}/settings.json; never transmitted except to the configured LLM API endpoint",
        "MCP server URLs: Hardcoded to https://mcp.sefaria.org/sse and https://developers.sefaria.org/mcp \u{2014} not user-configurable",
        "Rate limiting: Client-side RPM tracking prevents API abuse and protects against runaway tool-call loops (max 10 rounds)",
    ];

    Ok(Section::builder()
        .title(CHAPTERS[9])
        .push_block(chapter(9))
        .push_block(elements::text(
            "The application follows Electron security best practices to minimize attack surface. \
             Below is a summary of the security controls in place.",
        ))
        .push_block(h2("Electron Security Configuration"))
        .push_block(table(
            ["Setting", "Value", "Purpose"],
            &[
                ["contextIsolation", "true", "Renderer code cannot access Node.js globals"],
                ["nodeIntegration", "false", "No require() or process in renderer"],
                ["sandbox", "true", "Renderer runs in Chromium sandbox"],
                ["webviewTag", "true", "Needed for embedded text viewer (restricted)"],
            ],
        )?)
        .push_block(h2("Context Bridge"))
        .push_block(elements::text(
            "The preload script exposes a strictly typed window.sefaria API via contextBridge. \
             The renderer has no access to ipcRenderer, require, process, or any Node.js API directly. \
             Each API method maps to a specific IPC channel with defined parameter types.",
        ))
        .push_block(h2("Navigation & Popup Control"))
        .extend_blocks(bullets(CONTROLS))
        .push_block(h2("Input Validation"))
        .extend_blocks(bullets(VALIDATIONS))
        .push_block(h2("Data Privacy"))
        .push_block(elements::text(
            "All user data (settings, API keys, chat history) is stored locally on the user's machine \
             in the Electron userData directory. No telemetry or analytics are collected. Chat messages are \
             sent only to the user-configured LLM provider and Sefaria's MCP servers.",
        ))
        .push_block(h2("Code Signing"))
        .push_block(elements::text(
            "Windows distributables are signed with a SHA-256 certificate (subject: \"Sefaria Chat\") \
             to ensure binary integrity and prevent tampering warnings. The certificate is stored in \
             the Windows Certificate Store, not in the repository.",
        ))
        .push_block(h2("Update Security"))
        .push_block(elements::text(
            "Updates are delivered through the Microsoft Store, which handles code signing verification \
             and integrity checks. All communication uses HTTPS.",
        ))
        .build())
}
