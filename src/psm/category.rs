//! Grouping of PSM evidence into coloured categories.

use serde::{Deserialize, Serialize};

use crate::graph::{EntityGraph, Peptide, Psm, Sample};

/// Name of the group collecting evidence outside every category.
pub const OTHER_GROUP: &str = "other";

/// A sample attribute evidence can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleAttribute {
    Tissue,
    Sex,
    Age,
    Phenotype,
    Accession,
}

impl SampleAttribute {
    pub fn value(self, sample: &Sample) -> Option<&str> {
        match self {
            SampleAttribute::Tissue => Some(sample.tissue.as_str()),
            SampleAttribute::Sex => Some(sample.sex.as_str()),
            SampleAttribute::Age => sample.age.as_deref(),
            SampleAttribute::Phenotype => Some(sample.phenotype.as_str()),
            SampleAttribute::Accession => Some(sample.accession.as_str()),
        }
    }
}

/// What decides the category of a piece of evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightVariable {
    /// The peptide's `class_2`.
    #[default]
    PeptideClass,
    /// An attribute of the sample each spectrum was measured from.
    SampleAttribute(SampleAttribute),
}

impl HighlightVariable {
    /// Parse the names used in configuration files and on the command line.
    ///
    /// ```
    /// use ferro_proteoform::psm::{HighlightVariable, SampleAttribute};
    ///
    /// assert_eq!(HighlightVariable::from_name("pep_class2"), Some(HighlightVariable::PeptideClass));
    /// assert_eq!(
    ///     HighlightVariable::from_name("tissue"),
    ///     Some(HighlightVariable::SampleAttribute(SampleAttribute::Tissue))
    /// );
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let attribute = match name.trim().to_ascii_lowercase().as_str() {
            "pep_class2" | "class_2" | "peptide_class" | "class" => {
                return Some(HighlightVariable::PeptideClass)
            }
            "tissue" | "tissue_name" => SampleAttribute::Tissue,
            "sex" | "indiv_sex" | "individual_sex" => SampleAttribute::Sex,
            "age" | "indiv_age" | "individual_age" => SampleAttribute::Age,
            "phenotype" => SampleAttribute::Phenotype,
            "accession" | "pride_accession" | "pride_project_accession" => {
                SampleAttribute::Accession
            }
            _ => return None,
        };
        Some(HighlightVariable::SampleAttribute(attribute))
    }
}

/// A named category and its colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub colour: String,
}

impl Category {
    pub fn new(name: impl Into<String>, colour: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colour: colour.into(),
        }
    }
}

/// Categories, their colours, and what evidence is grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub categories: Vec<Category>,
    pub other_colour: String,
    pub highlight: HighlightVariable,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                Category::new("proteoform-specific", "#01508c"),
                Category::new("protein-specific", "#73B2E3"),
                Category::new("multi-gene", "#EECC1C"),
            ],
            other_colour: "#bdbdbd".to_string(),
            highlight: HighlightVariable::PeptideClass,
        }
    }
}

impl CategoryConfig {
    /// Group names in histogram order. Sample attribute grouping puts
    /// [`OTHER_GROUP`] first.
    pub fn group_names(&self) -> Vec<String> {
        let names = self.categories.iter().map(|c| c.name.clone());
        match self.highlight {
            HighlightVariable::PeptideClass => names.collect(),
            HighlightVariable::SampleAttribute(_) => {
                std::iter::once(OTHER_GROUP.to_string()).chain(names).collect()
            }
        }
    }

    /// Colours parallel to [`CategoryConfig::group_names`].
    pub fn group_colours(&self) -> Vec<String> {
        let colours = self.categories.iter().map(|c| c.colour.clone());
        match self.highlight {
            HighlightVariable::PeptideClass => colours.collect(),
            HighlightVariable::SampleAttribute(_) => std::iter::once(self.other_colour.clone())
                .chain(colours)
                .collect(),
        }
    }

    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn colour_of(&self, name: &str) -> &str {
        self.category_index(name)
            .map_or(self.other_colour.as_str(), |idx| {
                self.categories[idx].colour.as_str()
            })
    }

    /// Category value of one PSM under a sample attribute grouping.
    pub(crate) fn attribute_of<'g>(
        &self,
        graph: &'g EntityGraph,
        psm: &Psm,
    ) -> Option<&'g str> {
        match self.highlight {
            HighlightVariable::PeptideClass => None,
            HighlightVariable::SampleAttribute(attribute) => graph
                .sample_of(psm)
                .and_then(|sample| attribute.value(sample)),
        }
    }

    /// PSM counts of `peptide` per histogram group.
    ///
    /// `None` when grouping by peptide class and the peptide's class is not
    /// a configured category.
    pub(crate) fn group_counts(&self, graph: &EntityGraph, peptide: &Peptide) -> Option<Vec<usize>> {
        match self.highlight {
            HighlightVariable::PeptideClass => {
                let idx = self.category_index(&peptide.class_2)?;
                let mut counts = vec![0; self.categories.len()];
                counts[idx] = peptide.psm_count();
                Some(counts)
            }
            HighlightVariable::SampleAttribute(_) => {
                let mut counts = vec![0; self.categories.len() + 1];
                for psm in &peptide.psms {
                    let group = self
                        .attribute_of(graph, psm)
                        .and_then(|value| self.category_index(value))
                        .map_or(0, |idx| idx + 1);
                    counts[group] += 1;
                }
                Some(counts)
            }
        }
    }
}
