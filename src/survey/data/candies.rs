//
// The candy columns of the survey export, and the names we publish them under.
// Column identifiers are the raw headers in the CSV file.
//

use crate::defs::AgeBracket;

pub const AGE_FIELD: &str = "Q3_AGE";

pub const CANDY_NAMES_BY_FIELD: &[(&str, &str)] = &[
    ("Q6_Butterfinger", "Butterfinger"),
    ("Q6_Candy_Corn", "Candy Corn"),
    ("Q6_Chiclets", "Chiclets"),
    ("Q6_Dots", "Dots"),
    ("Q6_Fuzzy_Peaches", "Fuzzy Peaches"),
    ("Q6_Good_N_Plenty", "Good & Plenty"),
    ("Q6_Gummy_Bears_straight_up", "Gummy bears"),
    ("Q6_Healthy_Fruit", "Healthy Fruit"),
    ("Q6_Heath_Bar", "Heath Bar"),
    ("Q6_Hershey_s_Dark_Chocolate", "Hershey's Dark Chocolate"),
    ("Q6_Hershey_s_Milk_Chocolate", "Hershey's Milk Chocolate"),
    ("Q6_Hershey_s_Kisses", "Hershey's Kisses"),
    ("Q6_Jolly_Rancher_bad_flavor", "Jolly Rancher (a bad flavor)"),
    ("Q6_Jolly_Ranchers_good_flavor", "Jolly Rancher (a good flavor)"),
    ("Q6_Junior_Mints", "Junior Mints"),
    ("Q6_Kit_Kat", "Kit Kat"),
    ("Q6_LaffyTaffy", "Laffy Taffy"),
    ("Q6_LemonHeads", "Lemonhead"),
    ("Q6_Licorice_not_black", "Licorice (not black)"),
    ("Q6_Licorice_yes_black", "Licorice (black)"),
    ("Q6_Lollipops", "Lollipops"),
    ("Q6_Mike_and_Ike", "Mike and Ike"),
    ("Q6_Milk_Duds", "Milk Duds"),
    ("Q6_Milky_Way", "Milky Ways"),
    ("Q6_Regular_M_Ms", "Regular M&M's"),
    ("Q6_Peanut_M_M_s", "Peanut M&M's"),
    ("Q6_Mint_Kisses", "Mint Kisses"),
    ("Q6_Mr_Goodbar", "Mr. Goodbar"),
    ("Q6_Nerds", "Nerds"),
    ("Q6_Nestle_Crunch", "Nestlé crunch"),
    ("Q6_Peeps", "Peeps"),
    ("Q6_Pixy_Stix", "Pixy Stix"),
    ("Q6_Reese_s_Peanut_Butter_Cups", "Reese's Peanut Butter Cups"),
    ("Q6_Reese_s_Pieces", "Reese's Pieces"),
    ("Q6_Rolos", "Rolos"),
    ("Q6_Skittles", "Skittles"),
    ("Q6_Snickers", "Snickers"),
    ("Q6_Sourpatch_Kids_i_e_abominations_of_nature", "Sour Patch Kids"),
    ("Q6_Starburst", "Starburst"),
    ("Q6_Swedish_Fish", "Swedish Fish"),
    ("Q6_Tic_Tacs", "Tic Tacs"),
    ("Q6_Three_Musketeers", "3 Musketeers"),
    ("Q6_Tolberone_something_or_other", "Toblerone"),
    ("Q6_Trail_Mix", "Trail Mix"),
    ("Q6_Twix", "Twix"),
    ("Q6_Whatchamacallit_Bars", "Whatchamacallit Bars"),
    ("Q6_York_Peppermint_Patties", "York Peppermint Patties"),
];

// NB: the last label says 51 but the bracket starts at 50; the label is
// what was published, so consumers of the json key on it as-is
pub fn default_age_brackets() -> Vec<AgeBracket> {
    vec![
        AgeBracket::new("29 or younger", None, Some(30)),
        AgeBracket::new("30 to 39", Some(30), Some(40)),
        AgeBracket::new("40 to 49", Some(40), Some(50)),
        AgeBracket::new("51 or older", Some(50), None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fields_and_names_are_unique() {
        let fields: HashSet<&str> = CANDY_NAMES_BY_FIELD.iter().map(|(f, _)| *f).collect();
        let names: HashSet<&str> = CANDY_NAMES_BY_FIELD.iter().map(|(_, n)| *n).collect();
        assert_eq!(fields.len(), CANDY_NAMES_BY_FIELD.len());
        assert_eq!(names.len(), CANDY_NAMES_BY_FIELD.len());
        assert!(!fields.contains(AGE_FIELD));
    }
}
