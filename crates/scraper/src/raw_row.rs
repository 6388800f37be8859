// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The strategy-agnostic shape a card/listing is extracted into, before
//! normalization into a [`jh_core::Job`].

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub posted_date: Option<String>,
}

impl RawRow {
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = Some(value),
            "company" => self.company = Some(value),
            "location" => self.location = Some(value),
            "url" => self.url = Some(value),
            "salary" => self.salary = Some(value),
            "description" => self.description = Some(value),
            "requirements" => self.requirements = Some(value),
            "posted_date" => self.posted_date = Some(value),
            other => tracing::debug!(field = other, "ignoring unrecognized raw row field"),
        }
    }
}
