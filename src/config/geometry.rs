// ==========================================
// CORE kesim listesi - cabinet geometry parameters
// ==========================================
// Value object for one analysis run: standard cabinet dimensions,
// offset ("düşüm") constants, tolerance and thickness thresholds.
// Loaded once per run (ConfigManager or Default), never mutated
// by the classifier.
// ==========================================

use crate::domain::CabinetClass;
use serde::{Deserialize, Serialize};

// ==========================================
// GeometryParams
// ==========================================
// All lengths in millimetres; thicknesses in millimetres as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryParams {
    // ===== standard cabinet dimensions =====
    pub base_height_mm: u32, // alt dolap
    pub base_depth_mm: u32,
    pub wall_height_mm: u32, // üst dolap
    pub wall_depth_mm: u32,
    pub tall_height_mm: u32, // boy dolap
    pub tall_depth_mm: u32,

    // ===== offset ("düşüm") constants =====
    pub side_offset_mm: u32,             // ALT-ÜST / SABİT width: module - 36
    pub top_bottom_depth_offset_mm: u32, // ALT-ÜST depth: depth - 1
    pub fixed_shelf_depth_offset_mm: u32, // SABİT depth: depth - 23
    pub shelf_width_offset_mm: u32,      // RAF width: module - 37
    pub shelf_depth_base_offset_mm: u32, // RAF depth (alt): depth - 50
    pub shelf_depth_wall_offset_mm: u32, // RAF (ÜST) depth: depth - 40
    pub back_offset_mm: u32,             // ARKALIK: both edges - 18
    pub back_recessed_offset_mm: u32,    // ARKALIK (İÇERDE): both edges - 37

    // ===== matching =====
    pub tolerance_mm: u32, // max |measured - formula| for a match

    // ===== thickness policy =====
    pub back_panel_max_thickness_mm: u32, // thin-material threshold (<=)
    pub body_default_thickness_mm: u32,   // fallback for unknown materials

    // ===== rail band (KAYIT/KUŞAK) =====
    pub rail_min_mm: u32,
    pub rail_max_mm: u32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            base_height_mm: 720,
            base_depth_mm: 580,
            wall_height_mm: 720,
            wall_depth_mm: 330,
            tall_height_mm: 2100,
            tall_depth_mm: 580,

            side_offset_mm: 36,
            top_bottom_depth_offset_mm: 1,
            fixed_shelf_depth_offset_mm: 23,
            shelf_width_offset_mm: 37,
            shelf_depth_base_offset_mm: 50,
            shelf_depth_wall_offset_mm: 40,
            back_offset_mm: 18,
            back_recessed_offset_mm: 37,

            tolerance_mm: 5,

            back_panel_max_thickness_mm: 8,
            body_default_thickness_mm: 18,

            rail_min_mm: 80,
            rail_max_mm: 140,
        }
    }
}

impl GeometryParams {
    /// Standard height of a cabinet class.
    pub fn height_of(&self, class: CabinetClass) -> u32 {
        match class {
            CabinetClass::Base => self.base_height_mm,
            CabinetClass::Wall => self.wall_height_mm,
            CabinetClass::Tall => self.tall_height_mm,
        }
    }

    /// Standard depth of a cabinet class.
    pub fn depth_of(&self, class: CabinetClass) -> u32 {
        match class {
            CabinetClass::Base => self.base_depth_mm,
            CabinetClass::Wall => self.wall_depth_mm,
            CabinetClass::Tall => self.tall_depth_mm,
        }
    }

    /// Tolerance check: |measured - expected| <= tolerance.
    pub fn within_tolerance(&self, measured: u32, expected: u32) -> bool {
        measured.abs_diff(expected) <= self.tolerance_mm
    }
}
