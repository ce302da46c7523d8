/// Curated nerd font glyphs used to prefix armory output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerdFont {
    // Status and feedback
    Check,      //
    Cross,      //
    Warning,    //
    Info,       //
    Question,   //

    // Files and transfers
    Folder,     //
    Download,   //
    Archive,    //
    Trash,      //

    // System
    Terminal,   //
    Gear,       //
    Wrench,     //
    Bug,        //
    Lock,       //
    Cpu,        //

    // Catalog
    Search,     //
    List,       //
    Git,        //
    Package,    //
    Sync,       //
    Shield,     //
}

impl NerdFont {
    /// Get the Unicode character for this nerd font icon
    pub const fn unicode(&self) -> char {
        match self {
            Self::Check => '\u{f00c}',    // fa-check
            Self::Cross => '\u{f00d}',    // fa-times
            Self::Warning => '\u{f071}',  // fa-exclamation-triangle
            Self::Info => '\u{f05a}',     // fa-info-circle
            Self::Question => '\u{f059}', // fa-question-circle

            Self::Folder => '\u{f07b}',   // fa-folder
            Self::Download => '\u{f019}', // fa-download
            Self::Archive => '\u{f187}',  // fa-archive
            Self::Trash => '\u{f1f8}',    // fa-trash

            Self::Terminal => '\u{f120}', // fa-terminal
            Self::Gear => '\u{f013}',     // fa-gear
            Self::Wrench => '\u{f0ad}',   // fa-wrench
            Self::Bug => '\u{f188}',      // fa-bug
            Self::Lock => '\u{f023}',     // fa-lock
            Self::Cpu => '\u{f2db}',      // fa-microchip

            Self::Search => '\u{f002}',   // fa-search
            Self::List => '\u{f03a}',     // fa-list
            Self::Git => '\u{f1d3}',      // fa-git
            Self::Package => '\u{f187}',  // fa-archive (reused)
            Self::Sync => '\u{f021}',     // fa-refresh
            Self::Shield => '\u{f132}',   // fa-shield
        }
    }
}

impl std::fmt::Display for NerdFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unicode())
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}
