//! Outbreak statistics scraped from a public HTML summary page.
//!
//! The page carries the worldwide totals as its first two `<h1>` headings,
//! followed by two tables (infections, then deaths) whose rows start with a
//! linked region name and hold the count in a `text-right` cell.

use scraper::{ElementRef, Html, Selector};

use crate::core::telemetry::FieldError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionStats {
    pub name: String,
    pub infected: Option<String>,
    pub dead: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutbreakStats {
    pub world_infected: Option<String>,
    pub world_dead: Option<String>,
    pub regions: Vec<RegionStats>,
}

fn selector(css: &str) -> Result<Selector, FieldError> {
    Selector::parse(css).map_err(|e| {
        log::error!("Invalid selector {:?}: {:?}", css, e);
        FieldError::Failed
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract totals for `regions` from the page. Counts that cannot be found
/// stay `None`.
pub fn parse_outbreak_page(html: &str, regions: &[String]) -> Result<OutbreakStats, FieldError> {
    let document = Html::parse_document(html);
    let heading = selector("h1")?;
    let row = selector("tr")?;
    let name_cell = selector("td a")?;
    let count_cell = selector("td.text-right")?;

    let mut headings = document
        .select(&heading)
        .map(text_of)
        .filter(|text| !text.is_empty());
    let world_infected = headings.next();
    let world_dead = headings.next();

    let mut stats: Vec<RegionStats> = regions
        .iter()
        .map(|name| RegionStats {
            name: name.clone(),
            ..Default::default()
        })
        .collect();

    for tr in document.select(&row) {
        let Some(name) = tr.select(&name_cell).next().map(text_of) else {
            continue;
        };
        let Some(region) = stats.iter_mut().find(|r| r.name == name) else {
            continue;
        };
        let Some(count) = tr.select(&count_cell).next().map(text_of) else {
            continue;
        };
        // first table seen is infections, second is deaths
        if region.infected.is_none() {
            region.infected = Some(count);
        } else if region.dead.is_none() {
            region.dead = Some(count);
        }
    }

    Ok(OutbreakStats {
        world_infected,
        world_dead,
        regions: stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="card"><h1>197,168</h1><p>Infected</p></div>
  <div class="card"><h1>7,948</h1><p>Deaths</p></div>
  <div class="card"><h1>80,840</h1><p>Recovered</p></div>
  <table id="infected">
    <tr><th>Country</th><th>Infected</th></tr>
    <tr><td><a href="/countries/mainland-china">Mainland China</a></td>
        <td class="text-right">81,058</td></tr>
    <tr><td><a href="/countries/italy">Italy</a></td>
        <td class="text-right">31,506</td></tr>
    <tr><td><a href="/countries/spain">Spain</a></td>
        <td class="text-right">11,748</td></tr>
  </table>
  <table id="deaths">
    <tr><td><a href="/countries/mainland-china">Mainland China</a></td>
        <td class="text-right">3,230</td></tr>
    <tr><td><a href="/countries/italy">Italy</a></td>
        <td class="text-right">2,503</td></tr>
  </table>
</body></html>
"#;

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_world_totals_from_headings() {
        let stats = parse_outbreak_page(PAGE, &[]).unwrap();
        assert_eq!(stats.world_infected.as_deref(), Some("197,168"));
        assert_eq!(stats.world_dead.as_deref(), Some("7,948"));
    }

    #[test]
    fn test_region_rows() {
        let stats =
            parse_outbreak_page(PAGE, &regions(&["Mainland China", "Italy", "Netherlands"]))
                .unwrap();
        assert_eq!(stats.regions[0].infected.as_deref(), Some("81,058"));
        assert_eq!(stats.regions[0].dead.as_deref(), Some("3,230"));
        assert_eq!(stats.regions[1].infected.as_deref(), Some("31,506"));
        assert_eq!(stats.regions[1].dead.as_deref(), Some("2,503"));
        assert_eq!(stats.regions[2].infected, None);
        assert_eq!(stats.regions[2].dead, None);
    }

    #[test]
    fn test_unrelated_page_yields_nothing() {
        let stats = parse_outbreak_page("<p>Service Unavailable</p>", &regions(&["Italy"])).unwrap();
        assert_eq!(stats.world_infected, None);
        assert_eq!(stats.regions[0], RegionStats { name: "Italy".into(), ..Default::default() });
    }
}
