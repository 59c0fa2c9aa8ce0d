//! Static company → article list lookup.

use serde::Serialize;

const BUILTIN: &[(&str, [&str; 10])] = &[
    (
        "Apple",
        [
            "c9vy0m8ggz3o", "c0l1kpz3w32o", "c8rkpv50x01o", "ce980m2xv30o", "c798xv5qwylo",
            "c4g0rr51gn3o", "clyjv8e49deo", "cn524lx9445o", "cvgw30dr0w3o", "c20g288yldko",
        ],
    ),
    (
        "Google",
        [
            "c39v2ykwgdno", "ckgzm1lgv22o", "cm21g0052dno", "crlky380wd7o", "cp820m733p3o",
            "c3rw3e5je5po", "cy081nqx2zjo", "cx2j15r1g09o", "c5y6eq2zxlno", "c4g91kyjw07o",
        ],
    ),
    (
        "McDonald's",
        [
            "cr423p4e7qdo", "ce34j3qpjqko", "c337m3v3mgzo", "c4gp2npen26o", "c4g007qgll8o",
            "ce8vdjd91z4o", "c5yr5xvkelzo", "cj3e6yrl5nlo", "cde9p7wld3wo", "c87dwrnplwdo",
        ],
    ),
    (
        "Tesla",
        [
            "c0kgy20x0x4o", "cp8vd0j5zk2o", "c201z4lv5xxo", "cqjdg4x08ylo", "cnvze9dzq8vo",
            "cvgd9v3r69qo", "c204yvv1eexo", "cz61vwjel2zo", "crkn28dpl4no", "cvgm21zjggro",
        ],
    ),
    (
        "Starbucks",
        [
            "cp3y0j558l7o", "czedrregr0wo", "c625n63epyzo", "c3rnq2lv1lzo", "c80yerynrp9o",
            "cy9lg8pgjreo", "cdxnv4rjdq4o", "cz0rp80er7jo", "cevgzweexdno", "cwy1jegx74jo",
        ],
    ),
];

/// One company and its ordered article identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyArticles {
    pub company: String,
    pub article_ids: Vec<String>,
}

/// Companies available for analysis, in listing order
#[derive(Debug, Clone, Default)]
pub struct CompanyRegistry {
    entries: Vec<CompanyArticles>,
}

impl CompanyRegistry {
    /// The five built-in companies with ten news articles each
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(company, ids)| (company.to_string(), ids.iter().map(|id| id.to_string()).collect())),
        )
    }

    /// Later duplicates of a company name replace the earlier article list.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut registry = Self::default();
        for (company, article_ids) in entries {
            match registry.entries.iter_mut().find(|e| e.company == company) {
                Some(existing) => existing.article_ids = article_ids,
                None => registry.entries.push(CompanyArticles { company, article_ids }),
            }
        }
        registry
    }

    /// Exact, case-sensitive name match
    pub fn lookup(&self, company: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.company == company)
            .map(|e| e.article_ids.as_slice())
    }

    pub fn companies(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.company.as_str()).collect()
    }

    pub fn entries(&self) -> &[CompanyArticles] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
