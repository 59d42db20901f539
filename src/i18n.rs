// Localized strings
// English and French texts shown to the user

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    En,
    #[default]
    Fr,
}

/// Every user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    SelectFolder,
    ToggleHistory,
    ToggleLanguage,
    NoImages,
    LoadFailed,
    ErrorTitle,
    InfoTitle,
    DropHint,
    HistoryHeader,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Fr,
            Language::Fr => Language::En,
        }
    }

    pub fn text(self, text: Text) -> &'static str {
        match (self, text) {
            (Language::En, Text::Title) => "Random Image Viewer",
            (Language::Fr, Text::Title) => "Visionneuse d'images aleatoires",
            (Language::En, Text::SelectFolder) => "Select folder (R: Pick a random picture)",
            (Language::Fr, Text::SelectFolder) => "Choisir un dossier (R: nouvelle image)",
            (Language::En, Text::ToggleHistory) => "History ON/OFF",
            (Language::Fr, Text::ToggleHistory) => "Historique ON/OFF",
            (_, Text::ToggleLanguage) => "EN/FR",
            (Language::En, Text::NoImages) => "No images found in the folder.",
            (Language::Fr, Text::NoImages) => "Aucune image trouvee dans le dossier.",
            (Language::En, Text::LoadFailed) => "Unable to load image or invalid image",
            (Language::Fr, Text::LoadFailed) => "Impossible de charger l'image ou image invalide",
            (Language::En, Text::ErrorTitle) => "Error",
            (Language::Fr, Text::ErrorTitle) => "Erreur",
            (_, Text::InfoTitle) => "Information",
            (Language::En, Text::DropHint) => "Drag and drop an image here\nor click the button",
            (Language::Fr, Text::DropHint) => {
                "Glissez-deposez une image ici\nou cliquez sur le bouton"
            }
            (Language::En, Text::HistoryHeader) => "History :",
            (Language::Fr, Text::HistoryHeader) => "Historique",
        }
    }
}
