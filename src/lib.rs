/*!
# Project Showcase

A small website for showcasing robotics, automation and 3D modeling projects,
backed by a spreadsheet used as an ad-hoc database.

## Overview

The project list lives in a spreadsheet. Two independent front ends read it:

- **Showcase** (`/`): downloads the published sheet as CSV, parses it and
  renders one card per named project.
- **Dashboard** (`/dashboard`): lists, creates, updates and deletes projects
  through a deployed script endpoint, and shows analytics (project count,
  category breakdown chart, top technologies chart).

## Pipelines

- CSV ingestion: `SheetClient::fetch_projects` → `loader::parse_csv` →
  `loader::parse_csv_line` → `theme::build_cards` → `pages::Pages::showcase`
- Analytics: `ScriptClient::list` → `analytics::aggregate_by_type` /
  `analytics::top_software` → `graph` PNG charts

## Modules

- **record**: `ProjectRecord`, a column → text map with an opaque `_row` key
- **loader**: quote-aware CSV line splitting and header-keyed record parsing
- **analytics**: category counts, technology frequencies, top-N
- **theme**: card theme lookup and card view model
- **store**: the dashboard's last fetched project list
- **config**: environment configuration
- **error**: error taxonomy shared by all modules
- **client**: HTTP clients for the CSV export and the script endpoint
- **graph**: chart rendering with plotters
- **downloader**: CSV and XLSX export
- **pages**: HTML templates
- **app**: routing and handlers

## Error policy

Network failures never crash a page: the handler logs them and renders an
inline message in place of the expected content. Ragged CSV rows and
unusable JSON records are dropped without a visible report.
*/

pub mod analytics;
pub mod config;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod record;
pub mod store;
pub mod theme;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod client;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod pages;

/// Re-export the types most callers need
pub use analytics::{Category, DashboardSummary, SoftwareUsage, TypeBreakdown};
pub use config::Config;
pub use error::{Result, ShowcaseError};
pub use loader::{parse_csv, parse_csv_line};
pub use record::ProjectRecord;
pub use store::ProjectStore;
