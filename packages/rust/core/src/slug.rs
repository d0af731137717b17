//! Display name → wiki article slug.
//!
//! Each kind carries a table of names whose article slug cannot be derived
//! mechanically (punctuation, aliases, disambiguation pages). Everything else
//! falls back to replacing spaces with underscores.

use holocron_shared::EntityKind;

const FILM_SLUGS: &[(&str, &str)] = &[
    ("The Phantom Menace", "Star_Wars:_Episode_I_The_Phantom_Menace"),
    ("Attack of the Clones", "Star_Wars:_Episode_II_Attack_of_the_Clones"),
    ("Revenge of the Sith", "Star_Wars:_Episode_III_Revenge_of_the_Sith"),
    ("A New Hope", "Star_Wars:_Episode_IV_A_New_Hope"),
    ("The Empire Strikes Back", "Star_Wars:_Episode_V_The_Empire_Strikes_Back"),
    ("Return of the Jedi", "Star_Wars:_Episode_VI_Return_of_the_Jedi"),
];

const CHARACTER_SLUGS: &[(&str, &str)] = &[
    ("Palpatine", "Darth_Sidious"),
    ("Boba Fett", "Boba_Fett"),
];

const PLANET_SLUGS: &[(&str, &str)] = &[
    ("Yavin IV", "Yavin_4"),
    ("Dantooine", "Dantooine"),
    ("Bestine IV", "Bestine_IV"),
];

const SPECIES_SLUGS: &[(&str, &str)] = &[
    ("Yoda's species", "Yoda's_species"),
    ("Mon Calamari", "Mon_Calamari"),
    ("Wookie", "Wookiee"),
    ("Pau'an", "Pau'an"),
    ("Kaminoan", "Kaminoan"),
    ("Droid", "Droid"),
];

const STARSHIP_SLUGS: &[(&str, &str)] = &[
    ("TIE/LN starfighter", "TIE/ln_space_superiority_starfighter"),
    ("X-wing", "X-wing_starfighter"),
    ("Jedi starfighter", "Delta-7_Aethersprite-class_light_interceptor"),
    ("Slave I", "Slave_I"),
    ("Imperial shuttle", "Lambda-class_T-4a_shuttle"),
];

const VEHICLE_SLUGS: &[(&str, &str)] = &[
    ("Sand Crawler", "Sandcrawler"),
    ("T-16 skyhopper", "T-16_skyhopper"),
    ("X-34 landspeeder", "X-34_landspeeder"),
    ("Snowspeeder", "T-47_airspeeder"),
    ("AT-AT", "All_Terrain_Armored_Transport"),
    ("AT-ST", "All_Terrain_Scout_Transport"),
    ("Storm IV Twin-Pod Cloud Car", "Storm_IV_Twin-Pod_cloud_car"),
    ("Sail Barge", "Khetanna"),
    ("Bantha-II cargo skiff", "Bantha-II_cargo_skiff"),
    ("TIE/in interceptor", "TIE/in_interceptor"),
    ("Imperial Speeder Bike", "74-Z_speeder_bike"),
    ("Vulture Droid", "Variable_Geometry_Self-Propelled_Battle_Droid_Mark_I"),
];

/// Exception table for a kind.
pub fn exceptions(kind: EntityKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        EntityKind::Films => FILM_SLUGS,
        EntityKind::Characters => CHARACTER_SLUGS,
        EntityKind::Planets => PLANET_SLUGS,
        EntityKind::Species => SPECIES_SLUGS,
        EntityKind::Starships => STARSHIP_SLUGS,
        EntityKind::Vehicles => VEHICLE_SLUGS,
    }
}

/// Wiki slug for an entity's display name.
pub fn slug_for(kind: EntityKind, name: &str) -> String {
    exceptions(kind)
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, slug)| (*slug).to_string())
        .unwrap_or_else(|| name.replace(' ', "_"))
}
