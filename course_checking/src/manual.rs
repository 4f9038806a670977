/*!

This is the long-form manual for `course_checking` and `sorgcheck`.

## Input formats

The following sources can be merged into one race:
* `json` the race description: courses, groups, competitors and recorded results
* `backup` the append-only log written by the card readout station
* `csv` finish times recorded per bib number

A race description must be loaded first. Readouts and times are then merged
into it in the order they are listed.

### `json`

The race description is a single JSON object. All the sections are optional
and unknown competitors referenced from a result are an error:

```json
{
    "name": "Spring Cup",
    "courses": [
        {"name": "Long", "controls": ["31", {"code": "32", "length": 250}, 33]}
    ],
    "groups": [
        {"name": "M21", "course": "Long"}
    ],
    "persons": [
        {"name": "John", "surname": "Doe", "bib": 12, "card": 2045678, "group": "M21"}
    ],
    "results": [
        {
            "bib": 12,
            "startTime": "10:01:00",
            "finishTime": "10:37:25.400",
            "splits": [{"code": 31, "time": "10:11:10"}],
            "status": "missingPunch"
        }
    ]
}
```

Notes:
- numbers may be written either as numbers or as quoted strings. `"bib": 12`
  and `"bib": "12"` mean the same thing. This matches what spreadsheet
  exports tend to produce.
- a control is either a bare code (`"31"` or `31`) or an object with a
  `code` and an optional `length` in meters. The code is a template, see the
  grammar below.
- times of day are written `HH:MM:SS` with an optional fractional part,
  for example `10:37:25.400`.
- a result refers to its competitor by `bib`, or by `card` when no bib is
  given. An unknown bib is an error; an unknown card only logs a warning and
  the result stays in the race without a person.
- `status` is one of `none`, `ok`, `disqualified`, `didNotFinish`,
  `missingPunch`. The status is recomputed by the checker anyway, but a
  `missingPunch` status marks the result as a candidate for group recovery.

### `backup`

The readout station appends one block per card to a plain text file:

```text
start
2045678
10:01:00
10:37:25
split_start
31 10:11:10
32 10:19:45
split_end
end
```

The two lines after the card number are the start and finish times; either
may be left empty when the card carries none. Blocks are matched to
competitors by card number. A competitor who already has a result gets the
punches replaced and the start and finish times filled in; a competitor
without one gets a fresh result. A card that belongs to nobody is kept in
the race as a result without a person.

### `csv`

Finish times recorded by hand, one row per competitor:

```text
bib,time
20,37:41.00
99,12:05.50
```

The time is written in the short `MM:SS.hh` notation commonly used by
stopwatch software. A header row is tolerated. Rows are matched to
competitors by bib number and rows without a matching competitor are
dropped with a warning.

## Control code templates

The `code` of a course control is a template. The checker walks the course
with a cursor and tries to advance it on every punch, in order. Extra
punches between matched controls are ignored.

* `31` the station code itself. The punch must carry this exact code.
* `%` any punch. The cursor advances on whatever comes next.
* `*` any punch with a code not already used by a matched control. Visiting
  the same station again does not count.
* `99(31,32)` any code from the list. The code written before the
  parentheses is not checked, only the list counts.
* `%(31,32)` like `%`, restricted to the codes in the list. Punches outside
  the list are skipped rather than matched.
* `*(31,32)` like `*`, restricted to the codes in the list.

List entries are compared as written: `31(31, 32)` contains the entry
`" 32"` with a leading space, and no punch prints itself that way. Keep
lists free of spaces.

A template that fits none of the forms above cannot ever be satisfied: the
whole course rejects every punch sequence and a warning is logged. The
checking never panics on operator input.

## Configuration

`sorgcheck` can run from a configuration file instead of command line
flags:

```json
{
    "outputSettings": {
        "raceName": "Spring Cup 2016",
        "raceDate": "2016-04-24",
        "raceLocation": "Hill Forest",
        "outputDirectory": "out",
        "showDeviations": true
    },
    "raceFileSources": [
        {"provider": "json", "filePath": "race.json"},
        {"provider": "backup", "filePath": "backup.txt"},
        {"provider": "csv", "filePath": "times.csv"}
    ],
    "rules": {
        "insertCost": 1,
        "deleteCost": 1,
        "replaceCost": 1,
        "recoverGroups": true,
        "rulesDescription": "Standard order checking"
    }
}
```

Notes:
- all the file paths are relative to the configuration file itself. Paths
  given on the command line are used as they are.
- `insertCost`, `deleteCost` and `replaceCost` drive the deviation scoring
  and accept numbers or quoted numbers. Every omitted cost is 1. Negative
  costs are rejected.
- `recoverGroups` turns on group recovery: competitors whose result came in
  marked `missingPunch` are moved to the first group whose course their
  punches satisfy. The `--recover-groups` flag does the same.
- `raceName` overrides the name from the race description in the summary.
  `raceDate` and `raceLocation` are copied into the summary header as they
  are and may be omitted.
- when `outputDirectory` is set, the summary is written to `summary.json`
  in that directory. The `-o` flag overrides this, and `-o stdout` disables
  the file output.

## The summary

The summary is a JSON document with a `config` header and one entry per
result:

```json
{
  "config": {
    "date": "2016-04-24",
    "didNotFinish": "0",
    "disqualified": "1",
    "location": "Hill Forest",
    "noPerson": "0",
    "ok": "1",
    "race": "Spring Cup 2016",
    "total": "2"
  },
  "results": [
    {
      "bib": 12,
      "card": 2045678,
      "deviation": "0",
      "finishTime": "10:37:25",
      "group": "M21",
      "name": "Doe John",
      "status": "OK"
    }
  ]
}
```

All the counts are written as strings. `date` and `location` come straight
from the configuration file and are `null` without one. The results are
sorted by bib, then
by card; entries without a person come last. The `deviation` entry appears
when `showDeviations` is on and the course is made of plain station codes
only: it is the weighted edit distance between the punched codes and the
course. Courses with wildcard or list templates have no single expected
sequence and carry no deviation.

A reference summary passed with `--reference` is compared against the
calculated one after both are put in this exact shape, and any difference
fails the run with a line by line diff.

*/
