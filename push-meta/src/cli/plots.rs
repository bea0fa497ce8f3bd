use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use push_meta_solver::{Plot, PlotSet, PlotValues};

/// Writes each recorded plot as `plot_<i>.csv` into `dir`: the description on the first
/// line, then one comma-separated row per grid row.
pub fn write_plots(dir: &Path, plots: &PlotSet) -> Result<()> {
    for (index, plot) in plots.plots().iter().enumerate() {
        let path = dir.join(format!("plot_{index}.csv"));
        write_plot(&path, plot)
            .with_context(|| format!("failed to write plot `{}`", path.display()))?;
        eprintln!("plot `{}` written", path.display());
    }
    Ok(())
}

fn write_plot(path: &Path, plot: &Plot) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}", plot.desc())?;
    for y in 0..plot.height() {
        for x in 0..plot.width() {
            if x != 0 {
                write!(file, ",")?;
            }
            match plot.values() {
                PlotValues::Float(values) => write!(file, "{}", values[x + y * plot.width()])?,
                PlotValues::Size(values) => write!(file, "{}", values[x + y * plot.width()])?,
            }
        }
        writeln!(file)?;
    }
    file.flush()?;
    Ok(())
}
