//
// Writes the chart page: a stacked bar chart, a mosaic of the focused
// candy and the rating reorder control.
//
// The page carries the chart records as embedded json and binds them with
// d3 (d3.stack for the bars, a slice-dice d3.treemap for the mosaic);
// SortableJS drives the reorder control. We only lay out the document.
//

use std::collections::BTreeMap;

use crate::chart::order::{self, RatingOrder};
use crate::chart::records::ChartRecord;
use crate::defs::Rating;
use crate::error::{Error, Result};

pub const ANIMATION_DURATION: u32 = 150;

pub const BAR_HEIGHT: u32 = 20;
pub const BAR_CHART_WIDTH: u32 = 640;
pub const BAR_MARGIN_LEFT: u32 = 140;

pub const MOSAIC_CHART_WIDTH: u32 = 480;
pub const MOSAIC_CHART_HEIGHT: u32 = 480;
pub const MOSAIC_PADDING: u32 = 10;

const D3_SRC: &str = "https://cdn.jsdelivr.net/npm/d3@7/dist/d3.min.js";
const SORTABLE_SRC: &str = "https://cdn.jsdelivr.net/npm/sortablejs@1.15.0/Sortable.min.js";

#[derive(Debug, Clone)]
pub struct RenderOpts {
    pub order: RatingOrder,
    // candy whose mosaic is shown first; the page picks the top bar otherwise
    pub focus: Option<String>,
}

impl Default for RenderOpts {
    fn default() -> RenderOpts {
        RenderOpts {
            order: order::DEFAULT_ORDER,
            focus: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Geometry {
    animation_duration: u32,
    bar_height: u32,
    bar_chart_width: u32,
    mosaic_width: u32,
    mosaic_height: u32,
    mosaic_padding: u32,
}

// everything the page script needs, serialized into the document
#[derive(Debug, Serialize)]
struct PageData<'a> {
    records: &'a [ChartRecord],
    ratings: Vec<&'static str>,
    order: Vec<&'static str>,
    focus: Option<&'a str>,
    colors: BTreeMap<&'static str, &'static str>,
    geometry: Geometry,
}

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Html {
        Html {
            buf: String::with_capacity(16 * 1024),
        }
    }

    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    fn finish(self) -> String {
        self.buf
    }
}

pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// json inside a <script> element must not contain "</"; "<\/" is the
// same string to a json parser
fn script_safe_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn render_page(records: &[ChartRecord], opts: &RenderOpts) -> Result<String> {
    if let Some(ref name) = opts.focus {
        if !records.iter().any(|r| &r.name == name) {
            return Err(Error::UnknownCandy(name.clone()));
        }
    }
    let data = PageData {
        records,
        ratings: Rating::ALL.iter().map(|r| r.name()).collect(),
        order: opts.order.iter().map(|r| r.name()).collect(),
        focus: opts.focus.as_ref().map(|s| s.as_str()),
        colors: Rating::ALL.iter().map(|r| (r.name(), r.color())).collect(),
        geometry: Geometry {
            animation_duration: ANIMATION_DURATION,
            bar_height: BAR_HEIGHT,
            bar_chart_width: BAR_CHART_WIDTH,
            mosaic_width: MOSAIC_CHART_WIDTH,
            mosaic_height: MOSAIC_CHART_HEIGHT,
            mosaic_padding: MOSAIC_PADDING,
        },
    };

    let mut w = Html::new();
    w.push("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    w.push("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    w.push("<title>Candy ratings</title><style>");
    w.push(CSS);
    w.push("</style></head><body>");

    write_reorder(&mut w, &opts.order);
    w.push(format!(
        "<div id=\"bar-chart\"><svg viewBox=\"-{} 0 {} {}\"></svg></div>",
        BAR_MARGIN_LEFT,
        BAR_MARGIN_LEFT + BAR_CHART_WIDTH,
        BAR_HEIGHT * records.len() as u32
    ));
    w.push(format!(
        "<div id=\"mosaic-chart\"><svg viewBox=\"0 0 {} {}\"></svg></div>",
        MOSAIC_CHART_WIDTH, MOSAIC_CHART_HEIGHT
    ));

    w.push("<script id=\"chart-data\" type=\"application/json\">");
    w.push(script_safe_json(&data)?);
    w.push("</script>");
    for src in [D3_SRC, SORTABLE_SRC].iter() {
        w.push(format!("<script src=\"{}\"></script>", src));
    }
    w.push("<script>");
    w.push(SCRIPT);
    w.push("</script></body></html>\n");
    Ok(w.finish())
}

fn write_reorder(w: &mut Html, order: &RatingOrder) {
    let total_width = (BAR_MARGIN_LEFT + BAR_CHART_WIDTH) as f64;
    w.push(format!(
        "<div id=\"reorder-container\" style=\"padding-left: {:.4}%\"><div class=\"reorder\">",
        100.0 * BAR_MARGIN_LEFT as f64 / total_width
    ));
    for rating in order.iter() {
        w.push(format!(
            "<div class=\"rating-container\" data-id=\"{}\">\
             <div class=\"inner-rating\" style=\"background-color: {}\">{}</div></div>",
            rating.name(),
            rating.color(),
            rating.name()
        ));
    }
    w.push("</div></div>");
}

const CSS: &str = "\
.bar { cursor: pointer; }
.reorder { display: flex; }
.rating-container { padding: 2px; cursor: grab; }
.inner-rating { padding: 4px 12px; font-family: sans-serif; }
svg { font-family: sans-serif; font-size: 10px; }
";

const SCRIPT: &str = r##"
(function () {
  var DATA = JSON.parse(document.getElementById("chart-data").textContent);
  var G = DATA.geometry;
  var records = DATA.records;
  var barChartHeight = G.bar_height * records.length;

  var barChart = d3.select("#bar-chart svg");
  var barAxisElement = barChart.append("g");
  var barY = d3.scaleLinear().range([0, G.bar_chart_width]).domain([0, 1]);
  var fraction = function (d, key) {
    return d.total ? d.ratings[key] / d.total : 0;
  };

  var mosaicChart = d3.select("#mosaic-chart svg");
  var treemap = d3.treemap()
    .size([G.mosaic_width, G.mosaic_height])
    .paddingInner(G.mosaic_padding)
    .tile(d3.treemapSliceDice);

  var leaves = function (ratings) {
    return DATA.ratings.map(function (rating) {
      return { name: rating, rating: rating, value: ratings[rating] };
    });
  };

  var focus = function (name) {
    var record = records.find(function (r) { return r.name === name; });
    if (!record) return;
    var children = record.ages
      ? record.ages.map(function (g) { return { name: g.name, children: leaves(g.ratings) }; })
      : leaves(record.ratings);
    var root = treemap(d3.hierarchy({ name: record.name, children: children })
      .sum(function (d) { return d.value; }));
    var boxes = mosaicChart.selectAll(".box")
      .data(root.leaves().filter(function (d) { return d.value > 0; }), function (d) {
        return d.parent.data.name + "/" + d.data.name;
      });
    boxes.exit().remove();
    var entered = boxes.enter().append("rect")
      .attr("class", "box")
      .attr("stroke", "white")
      .attr("fill", function (d) { return DATA.colors[d.data.rating]; });
    entered.append("title");
    var merged = entered.merge(boxes);
    merged.select("title").text(function (d) {
      var group = d.depth > 1 ? d.parent.data.name + ", " : "";
      return record.name + ": " + group + d.data.rating + " " + d.value;
    });
    merged.transition().duration(G.animation_duration)
      .attr("x", function (d) { return d.x0; })
      .attr("y", function (d) { return d.y0; })
      .attr("width", function (d) { return d.x1 - d.x0; })
      .attr("height", function (d) { return d.y1 - d.y0; });
  };

  var update = function (order) {
    var sorted = records.slice().sort(function (a, b) {
      return d3.descending(fraction(a, order[0]), fraction(b, order[0]));
    });
    var barX = d3.scaleBand().range([0, barChartHeight]).domain(sorted.map(function (d) { return d.name; }));
    var stacks = d3.stack().keys(order).order(d3.stackOrderNone).value(fraction)(sorted);

    var layers = barChart.selectAll(".layer").data(stacks, function (s) { return s.key; });
    var bars = layers.enter().append("g")
      .attr("class", "layer")
      .attr("fill", function (s) { return DATA.colors[s.key]; })
      .merge(layers)
      .selectAll(".bar")
      .data(function (s) { return s; }, function (d) { return d.data.name; });
    bars.enter().append("rect")
      .attr("class", "bar")
      .attr("stroke", "black")
      .on("click", function (event, d) { focus(d.data.name); })
      .merge(bars)
      .transition().duration(G.animation_duration)
      .attr("x", function (d) { return barY(d[0]); })
      .attr("y", function (d) { return barX(d.data.name); })
      .attr("width", function (d) { return barY(d[1]) - barY(d[0]); })
      .attr("height", barX.bandwidth());
    barAxisElement.transition().duration(G.animation_duration).call(d3.axisLeft(barX));
    return sorted;
  };

  var sorted = update(DATA.order);
  if (DATA.focus) {
    focus(DATA.focus);
  } else if (sorted.length) {
    focus(sorted[0].name);
  }

  var sortable = Sortable.create(document.querySelector(".reorder"), {
    animation: G.animation_duration,
    dataIdAttr: "data-id",
    onEnd: function () { update(sortable.toArray()); }
  });
})();
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::RatingCounts;

    fn record(name: &str, joy: u32, meh: u32, despair: u32) -> ChartRecord {
        let ratings = RatingCounts { joy, meh, despair };
        ChartRecord {
            name: name.to_string(),
            ratings,
            total: ratings.total(),
            ages: None,
        }
    }

    // pulls the embedded json back out of a rendered page
    fn page_data(page: &str) -> serde_json::Value {
        let open = "<script id=\"chart-data\" type=\"application/json\">";
        let start = page.find(open).unwrap() + open.len();
        let end = start + page[start..].find("</script>").unwrap();
        serde_json::from_str(&page[start..end]).unwrap()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(esc("Reese's <M&M's>"), "Reese&#39;s &lt;M&amp;M&#39;s&gt;");
        assert_eq!(esc("\"x\""), "&quot;x&quot;");
    }

    #[test]
    fn page_binds_records_with_d3_and_sortable() {
        let records = vec![record("Twix", 3, 1, 0), record("M&M's", 0, 1, 1)];
        let page = render_page(&records, &RenderOpts::default()).unwrap();
        assert!(page.contains(D3_SRC));
        assert!(page.contains(SORTABLE_SRC));
        assert!(page.contains("d3.stack()"));
        assert!(page.contains("d3.treemapSliceDice"));
        assert!(page.contains("Sortable.create"));

        let data = page_data(&page);
        assert_eq!(data["records"].as_array().unwrap().len(), 2);
        assert_eq!(data["records"][1]["name"], "M&M's");
        assert_eq!(data["records"][0]["ratings"]["joy"], 3);
        assert_eq!(data["order"], serde_json::json!(["joy", "meh", "despair"]));
        assert_eq!(data["colors"]["despair"], "#d65959");
        assert_eq!(data["geometry"]["animation_duration"], 150);
        assert_eq!(data["geometry"]["mosaic_padding"], 10);
        assert!(data["focus"].is_null());
    }

    #[test]
    fn reorder_control_follows_initial_order() {
        let opts = RenderOpts {
            order: [Rating::Despair, Rating::Meh, Rating::Joy],
            focus: Some("Peeps".to_string()),
        };
        let records = vec![record("Twix", 3, 1, 0), record("Peeps", 0, 1, 1)];
        let page = render_page(&records, &opts).unwrap();
        let despair = page.find("data-id=\"despair\"").unwrap();
        let joy = page.find("data-id=\"joy\"").unwrap();
        assert!(despair < joy);

        let data = page_data(&page);
        assert_eq!(data["order"], serde_json::json!(["despair", "meh", "joy"]));
        assert_eq!(data["focus"], "Peeps");
    }

    #[test]
    fn unknown_focus_is_an_error() {
        let opts = RenderOpts {
            focus: Some("Fruitcake".to_string()),
            ..RenderOpts::default()
        };
        match render_page(&[record("Twix", 1, 0, 0)], &opts) {
            Err(Error::UnknownCandy(name)) => assert_eq!(name, "Fruitcake"),
            other => panic!("expected unknown candy, got {:?}", other),
        }
    }

    #[test]
    fn names_cannot_close_the_data_script() {
        let page = render_page(&[record("</script><b>", 1, 0, 0)], &RenderOpts::default()).unwrap();
        assert!(!page.contains("</script><b>"));
        assert_eq!(page_data(&page)["records"][0]["name"], "</script><b>");
    }

    #[test]
    fn chart_frames_match_chart_units() {
        let records = vec![record("Twix", 1, 0, 1), record("Peeps", 0, 0, 1)];
        let page = render_page(&records, &RenderOpts::default()).unwrap();
        assert!(page.contains("<div id=\"bar-chart\"><svg viewBox=\"-140 0 780 40\">"));
        assert!(page.contains("<div id=\"mosaic-chart\"><svg viewBox=\"0 0 480 480\">"));
    }
}
